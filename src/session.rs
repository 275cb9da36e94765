//! Practice session - walks through a list of affirmations, one matcher reset each
//!
//! Timing is kept per phrase so the end-of-session summary can report how long
//! each affirmation took and how many recognizer updates it needed.

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};
use tracing::info;

use crate::config::MatcherConfig;
use crate::matcher::{HypothesisKind, Progress, SpeechProgressMatcher};

/// What a session step changed
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// Nothing visible changed
    Unchanged,
    /// The current phrase advanced
    Progress(Progress),
    /// The current phrase was finished and the next one (if any) is loaded
    Completed { phrase: String, elapsed: Duration },
}

#[derive(Debug, Clone)]
pub struct PhraseResult {
    pub phrase: String,
    pub elapsed: Duration,
    pub hypotheses: usize,
    pub completed: bool,
}

pub struct PracticeSession {
    phrases: Vec<String>,
    index: usize,
    matcher: SpeechProgressMatcher,
    phrase_started: Instant,
    hypotheses: usize,
    results: Vec<PhraseResult>,
    started_at: DateTime<Local>,
}

impl PracticeSession {
    pub fn new(phrases: Vec<String>, config: &MatcherConfig) -> Self {
        let mut matcher = SpeechProgressMatcher::new(config);
        if let Some(first) = phrases.first() {
            matcher.reset_for_text(first);
        }
        Self {
            phrases,
            index: 0,
            matcher,
            phrase_started: Instant::now(),
            hypotheses: 0,
            results: Vec::new(),
            started_at: Local::now(),
        }
    }

    pub fn current_phrase(&self) -> Option<&str> {
        self.phrases.get(self.index).map(String::as_str)
    }

    /// 1-based position of the current phrase and the phrase count
    pub fn position(&self) -> (usize, usize) {
        ((self.index + 1).min(self.phrases.len()), self.phrases.len())
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.phrases.len()
    }

    pub fn progress(&self) -> Progress {
        self.matcher.progress()
    }

    pub fn results(&self) -> &[PhraseResult] {
        &self.results
    }

    pub fn hear(&mut self, kind: HypothesisKind, text: &str) -> SessionUpdate {
        if self.is_finished() {
            return SessionUpdate::Unchanged;
        }
        self.hypotheses += 1;
        if !self.matcher.feed_hypothesis(kind, text) {
            return SessionUpdate::Unchanged;
        }
        if self.matcher.is_complete() {
            let result = self.finish_phrase(true);
            SessionUpdate::Completed {
                phrase: result.phrase,
                elapsed: result.elapsed,
            }
        } else {
            SessionUpdate::Progress(self.matcher.progress())
        }
    }

    /// Start the current phrase over
    pub fn restart(&mut self) {
        if let Some(phrase) = self.phrases.get(self.index) {
            self.matcher.reset_for_text(phrase);
        }
        self.phrase_started = Instant::now();
        self.hypotheses = 0;
    }

    /// Give up on the current phrase and move to the next one
    pub fn skip(&mut self) {
        if !self.is_finished() {
            self.finish_phrase(false);
        }
    }

    fn finish_phrase(&mut self, completed: bool) -> PhraseResult {
        let result = PhraseResult {
            phrase: self.phrases[self.index].clone(),
            elapsed: self.phrase_started.elapsed(),
            hypotheses: self.hypotheses,
            completed,
        };
        info!(
            phrase = %result.phrase,
            completed,
            elapsed = ?result.elapsed,
            "phrase finished"
        );
        self.results.push(result.clone());
        self.index += 1;
        self.restart();
        result
    }

    pub fn summary(&self) -> String {
        let mut out = format!(
            "Session started {}\n",
            self.started_at.format("%Y-%m-%d %H:%M")
        );
        if self.results.is_empty() {
            out.push_str("No affirmations finished yet.\n");
            return out;
        }
        for r in &self.results {
            let mark = if r.completed { "✓" } else { "–" };
            out.push_str(&format!(
                "{} {} ({:.1}s, {} updates)\n",
                mark,
                r.phrase,
                r.elapsed.as_secs_f64(),
                r.hypotheses
            ));
        }
        let done = self.results.iter().filter(|r| r.completed).count();
        let total: Duration = self.results.iter().map(|r| r.elapsed).sum();
        out.push_str(&format!(
            "{}/{} spoken, total {:.1}s\n",
            done,
            self.phrases.len(),
            total.as_secs_f64()
        ));
        out
    }
}
