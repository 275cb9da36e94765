use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::fuzzy::{EnglishSuffixStemmer, NoopStemmer, Stemmer, TokenMatcher};
use crate::tokenize;

const DEFAULT_PATH: &str = "config.toml";
const MAX_EDITS_LIMIT: usize = 3;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_affirmations")]
    pub affirmations: Vec<String>,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            affirmations: default_affirmations(),
            matcher: MatcherConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

fn default_affirmations() -> Vec<String> {
    vec![
        "I am enough".to_string(),
        "I am calm and grounded".to_string(),
        "I choose progress over perfection".to_string(),
    ]
}

// ============================================================================
// Matcher Config
// ============================================================================

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StemmerKind {
    /// Strip ing/ed/s before comparing
    #[default]
    English,
    /// Compare words as heard
    None,
}

impl StemmerKind {
    pub fn build(self) -> Box<dyn Stemmer> {
        match self {
            StemmerKind::English => Box::new(EnglishSuffixStemmer),
            StemmerKind::None => Box::new(NoopStemmer),
        }
    }
}

/// What each recognizer hypothesis contains
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptMode {
    /// Each hypothesis is the whole session transcript so far
    #[default]
    Cumulative,
    /// Each hypothesis is one independent utterance
    Utterance,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatcherConfig {
    /// Extra tokens kept past the target length when windowing a transcript
    #[serde(default = "default_window_slack")]
    pub window_slack: usize,
    /// Edit distance tolerated on longer words
    #[serde(default = "default_max_edits")]
    pub max_edits: usize,
    /// Words shorter than this must match exactly or by stem
    #[serde(default = "default_min_fuzzy_len")]
    pub min_fuzzy_len: usize,
    #[serde(default)]
    pub stemmer: StemmerKind,
    #[serde(default)]
    pub transcript_mode: TranscriptMode,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            window_slack: default_window_slack(),
            max_edits: default_max_edits(),
            min_fuzzy_len: default_min_fuzzy_len(),
            stemmer: StemmerKind::default(),
            transcript_mode: TranscriptMode::default(),
        }
    }
}

fn default_window_slack() -> usize {
    2
}

fn default_max_edits() -> usize {
    1
}

fn default_min_fuzzy_len() -> usize {
    4
}

impl MatcherConfig {
    pub fn token_matcher(&self) -> TokenMatcher {
        TokenMatcher::new(self.stemmer.build(), self.max_edits, self.min_fuzzy_len)
    }
}

// ============================================================================
// UI Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UiConfig {
    /// Highlight spoken words with color
    #[serde(default = "default_color")]
    pub color: bool,
    /// Echo each hypothesis under the progress line
    #[serde(default)]
    pub show_heard: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            show_heard: false,
        }
    }
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load `config.toml` from the working directory, or defaults if absent
    pub fn load() -> Result<Self> {
        let path = Path::new(DEFAULT_PATH);
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.matcher.max_edits > MAX_EDITS_LIMIT {
            return Err(Error::Invalid(format!(
                "matcher.max_edits must be at most {}, got {}",
                MAX_EDITS_LIMIT, self.matcher.max_edits
            )));
        }
        validate_affirmations(&self.affirmations)
    }
}

/// Reject affirmations with no speakable words; they could never complete
pub fn validate_affirmations(affirmations: &[String]) -> Result<()> {
    match affirmations
        .iter()
        .position(|a| tokenize::normalize(a).is_empty())
    {
        Some(i) => Err(Error::Invalid(format!(
            "affirmations[{}] has no words to speak: {:?}",
            i, affirmations[i]
        ))),
        None => Ok(()),
    }
}
