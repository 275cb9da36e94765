//! Incremental hypothesis diffing
//!
//! Speech recognizers re-send their whole current guess on every partial
//! result. `HypothesisDiffer` keeps the previous guess and hands back only the
//! words that were not there before.

use tracing::trace;

/// How a new hypothesis relates to the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HypothesisChange {
    /// Nothing was recorded before
    First,
    /// The previous hypothesis is a prefix of the new one
    Extended,
    /// The new hypothesis is a prefix of the previous one
    Retracted,
    /// Neither is a prefix of the other; the whole hypothesis counts as new
    Diverged,
}

#[derive(Debug, Default)]
pub struct HypothesisDiffer {
    last: Option<Vec<String>>,
}

impl HypothesisDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Return the newly spoken tokens and record `tokens` as the last hypothesis
    pub fn diff(&mut self, tokens: Vec<String>) -> (Vec<String>, HypothesisChange) {
        let (fresh, change) = match self.last.as_deref() {
            None => (tokens.clone(), HypothesisChange::First),
            Some(last) if tokens.starts_with(last) => {
                (tokens[last.len()..].to_vec(), HypothesisChange::Extended)
            }
            Some(last) if last.starts_with(&tokens) => (Vec::new(), HypothesisChange::Retracted),
            Some(_) => (tokens.clone(), HypothesisChange::Diverged),
        };
        trace!(?change, new = fresh.len(), total = tokens.len(), "hypothesis diff");
        self.last = Some(tokens);
        (fresh, change)
    }
}
