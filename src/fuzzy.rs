//! Fuzzy token matching using suffix stemming and bounded Levenshtein distance
//!
//! Tolerates inflection differences ("breathing" vs "breathed") and single
//! character transcription errors on longer words, while keeping short
//! function words ("a", "at", "an") strict.

use std::fmt;

/// Reduces a token to a comparable stem
pub trait Stemmer: Send + Sync {
    fn stem<'a>(&self, token: &'a str) -> &'a str;
}

/// Strips one common English inflection: `ing`, else `ed`, else `s`
///
/// A suffix is only removed when the remaining stem is longer than two
/// characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishSuffixStemmer;

const MIN_STEM_LEN: usize = 3;

impl Stemmer for EnglishSuffixStemmer {
    fn stem<'a>(&self, token: &'a str) -> &'a str {
        for suffix in ["ing", "ed", "s"] {
            if let Some(stem) = token.strip_suffix(suffix) {
                if stem.chars().count() >= MIN_STEM_LEN {
                    return stem;
                }
            }
        }
        token
    }
}

/// Leaves tokens untouched, for phrases outside English
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStemmer;

impl Stemmer for NoopStemmer {
    fn stem<'a>(&self, token: &'a str) -> &'a str {
        token
    }
}

/// Decides whether a heard token counts as a target token
pub struct TokenMatcher {
    stemmer: Box<dyn Stemmer>,
    max_edits: usize,
    min_fuzzy_len: usize,
}

impl fmt::Debug for TokenMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenMatcher")
            .field("max_edits", &self.max_edits)
            .field("min_fuzzy_len", &self.min_fuzzy_len)
            .finish_non_exhaustive()
    }
}

impl Default for TokenMatcher {
    fn default() -> Self {
        Self::new(Box::new(EnglishSuffixStemmer), 1, 4)
    }
}

impl TokenMatcher {
    pub fn new(stemmer: Box<dyn Stemmer>, max_edits: usize, min_fuzzy_len: usize) -> Self {
        Self {
            stemmer,
            max_edits,
            min_fuzzy_len,
        }
    }

    pub fn tokens_equal(&self, heard: &str, target: &str) -> bool {
        if heard == target {
            return true;
        }
        if self.stemmer.stem(heard) == self.stemmer.stem(target) {
            return true;
        }
        if heard.chars().count() >= self.min_fuzzy_len
            && target.chars().count() >= self.min_fuzzy_len
        {
            return levenshtein_within(heard, target, self.max_edits).is_some();
        }
        false
    }
}

/// Levenshtein distance, or `None` as soon as it is known to exceed `cap`
///
/// Two-row DP; gives up once every cell in the current row is above the cap.
pub fn levenshtein_within(a: &str, b: &str, cap: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > cap {
        return None;
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        let mut row_min = curr[0];
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
            row_min = row_min.min(curr[j]);
        }
        if row_min > cap {
            return None;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let dist = prev[b.len()];
    (dist <= cap).then_some(dist)
}
