//! affirm - tracks spoken progress through an affirmation phrase
//!
//! Feed it speech-recognizer hypotheses (partial or final, cumulative or per
//! utterance) and it reports how many words of the target phrase have been
//! said, in order, tolerating filler words and small transcription errors.

pub mod config;
pub mod differ;
pub mod error;
pub mod fuzzy;
pub mod matcher;
pub mod render;
pub mod repl;
pub mod session;
pub mod tokenize;

pub use config::{Config, MatcherConfig, StemmerKind, TranscriptMode};
pub use differ::{HypothesisChange, HypothesisDiffer};
pub use error::{Error, Result};
pub use fuzzy::{EnglishSuffixStemmer, NoopStemmer, Stemmer, TokenMatcher};
pub use matcher::{HypothesisKind, Progress, SpeechProgressMatcher};
pub use session::{PracticeSession, SessionUpdate};
