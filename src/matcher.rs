//! Speech progress matcher - tracks how much of a target phrase has been spoken
//!
//! The matcher keeps an append-only log of every word it has treated as heard
//! and a cursor into that log. Each target word is confirmed by scanning
//! forward from the cursor, so filler words and false starts between target
//! words are skipped, and a word already consumed can never be matched again.
//! Progress only moves forward until the next `reset_for_text`.

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::config::{MatcherConfig, TranscriptMode};
use crate::differ::HypothesisDiffer;
use crate::fuzzy::TokenMatcher;
use crate::tokenize;

/// Recognizer result kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HypothesisKind {
    /// Revisable interim result
    Partial,
    /// Confirmed result for the current utterance
    Final,
}

/// Read-only snapshot of matcher progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub active: usize,
    pub total: usize,
    pub complete: bool,
    /// Display words already confirmed
    pub spoken: Vec<String>,
    /// Display words still to be said
    pub pending: Vec<String>,
}

impl Progress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.active as f32 / self.total as f32
        }
    }
}

#[derive(Debug)]
pub struct SpeechProgressMatcher {
    target: Vec<String>,
    display: Vec<String>,
    heard: Vec<String>,
    heard_cursor: usize,
    active: usize,
    differ: HypothesisDiffer,
    tokens: TokenMatcher,
    window_slack: usize,
    mode: TranscriptMode,
}

impl Default for SpeechProgressMatcher {
    fn default() -> Self {
        Self::new(&MatcherConfig::default())
    }
}

impl SpeechProgressMatcher {
    pub fn new(config: &MatcherConfig) -> Self {
        Self {
            target: Vec::new(),
            display: Vec::new(),
            heard: Vec::new(),
            heard_cursor: 0,
            active: 0,
            differ: HypothesisDiffer::new(),
            tokens: config.token_matcher(),
            window_slack: config.window_slack,
            mode: config.transcript_mode,
        }
    }

    /// Start over with a new target phrase, discarding all progress
    pub fn reset_for_text(&mut self, phrase: &str) {
        self.target = tokenize::normalize(phrase);
        self.display = tokenize::to_display(phrase);
        self.heard.clear();
        self.heard_cursor = 0;
        self.active = 0;
        self.differ.clear();
        debug!(words = self.target.len(), "matcher reset");
    }

    /// Full normalization, for independent utterances
    pub fn tokenize_for_matching(&self, raw: &str) -> Vec<String> {
        tokenize::normalize(raw)
    }

    /// Normalize and keep only the tail window sized to the current target
    pub fn tokenize_for_current_window(&self, raw: &str) -> Vec<String> {
        tokenize::tail_window(tokenize::normalize(raw), self.target.len(), self.window_slack)
    }

    /// Newly spoken tokens relative to the previous hypothesis
    pub fn diff_against_last(&mut self, tokens: Vec<String>) -> Vec<String> {
        self.differ.diff(tokens).0
    }

    /// Append newly spoken tokens and advance as far as they allow
    ///
    /// Returns whether the active index or the heard cursor moved.
    #[hotpath::measure]
    pub fn feed(&mut self, tokens: &[String]) -> bool {
        if self.target.is_empty() || tokens.is_empty() {
            return false;
        }
        self.heard.extend_from_slice(tokens);

        let (start_active, start_cursor) = (self.active, self.heard_cursor);
        while self.active < self.target.len() {
            let target = &self.target[self.active];
            let found = self.heard[self.heard_cursor..]
                .iter()
                .position(|heard| self.tokens.tokens_equal(heard, target));
            let Some(offset) = found else { break };
            self.heard_cursor += offset + 1;
            self.active += 1;
        }

        if self.active != start_active {
            debug!(
                active = self.active,
                total = self.target.len(),
                "progress advanced"
            );
            if self.is_complete() {
                info!(words = self.target.len(), "phrase complete");
            }
        }
        self.active != start_active || self.heard_cursor != start_cursor
    }

    /// Tokenize, diff and feed one recognizer hypothesis
    pub fn feed_hypothesis(&mut self, kind: HypothesisKind, raw: &str) -> bool {
        let tokens = match self.mode {
            TranscriptMode::Cumulative => self.tokenize_for_current_window(raw),
            TranscriptMode::Utterance => self.tokenize_for_matching(raw),
        };
        let fresh = self.diff_against_last(tokens);
        match kind {
            HypothesisKind::Partial => trace!(text = raw, new = fresh.len(), "partial"),
            HypothesisKind::Final => debug!(text = raw, new = fresh.len(), "final"),
        }
        self.feed(&fresh)
    }

    pub fn target_tokens(&self) -> &[String] {
        &self.target
    }

    pub fn display_tokens(&self) -> &[String] {
        &self.display
    }

    pub fn active_token_index(&self) -> usize {
        self.active
    }

    pub fn heard_cursor(&self) -> usize {
        self.heard_cursor
    }

    pub fn heard_tokens(&self) -> &[String] {
        &self.heard
    }

    pub fn is_complete(&self) -> bool {
        !self.target.is_empty() && self.active >= self.target.len()
    }

    pub fn progress(&self) -> Progress {
        let split = self.active.min(self.display.len());
        Progress {
            active: self.active,
            total: self.target.len(),
            complete: self.is_complete(),
            spoken: self.display[..split].to_vec(),
            pending: self.display[split..].to_vec(),
        }
    }
}
