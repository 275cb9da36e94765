//! Text normalization for matching and display
//!
//! Both tokenizers classify characters the same way (ASCII alphanumerics are
//! kept, apostrophes are dropped, everything else splits), so a token index in
//! one sequence always points at the same word in the other.

/// Apostrophe variants that are removed outright so contractions collapse
const APOSTROPHES: [char; 5] = ['\'', '\u{2019}', '\u{2018}', '\u{02BC}', '`'];

fn tokens_with(text: &str, map: impl Fn(char) -> char) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| !APOSTROPHES.contains(c))
        .map(|c| if c.is_ascii_alphanumeric() { map(c) } else { ' ' })
        .collect();
    cleaned.split_whitespace().map(String::from).collect()
}

/// Normalize text into matching tokens: lowercase, no punctuation
pub fn normalize(text: &str) -> Vec<String> {
    tokens_with(text, |c| c.to_ascii_lowercase())
}

/// Tokens for rendering: original casing, first letter of the phrase capitalized
pub fn to_display(text: &str) -> Vec<String> {
    let mut tokens = tokens_with(text, |c| c);
    // tokens are ASCII only, so the first byte is the first character
    if let Some(head) = tokens.first_mut().and_then(|t| t.get_mut(..1)) {
        head.make_ascii_uppercase();
    }
    tokens
}

/// Keep the trailing `target_len + slack` tokens of a cumulative transcript
///
/// A zero-length target has no window, so the full token list comes back.
pub fn tail_window(mut tokens: Vec<String>, target_len: usize, slack: usize) -> Vec<String> {
    if target_len == 0 {
        return tokens;
    }
    let keep = target_len + slack;
    if tokens.len() > keep {
        tokens.drain(..tokens.len() - keep);
    }
    tokens
}
