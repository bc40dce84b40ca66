use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::corpus::{
    layout::DEFAULT_WORDS_PER_LINE, selector::DEFAULT_QUOTES_PER_ROUND, CorpusError, CorpusFeed,
    CorpusKind, QuotationFeed, QuotationSet, WordList, WordListFeed, DEFAULT_ROUND_TOKENS,
};
use crate::session::{SessionConfig, DEFAULT_DURATION_SECS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not write config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub duration_secs: u64,
    pub max_tokens: usize,
    pub words_per_line: usize,
    pub corpus: CorpusKind,
    pub word_list: String,
    pub quote_set: String,
    pub quotes_per_round: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            max_tokens: DEFAULT_ROUND_TOKENS,
            words_per_line: DEFAULT_WORDS_PER_LINE,
            corpus: CorpusKind::Words,
            word_list: "english".to_string(),
            quote_set: "quotes_english".to_string(),
            quotes_per_round: DEFAULT_QUOTES_PER_ROUND,
        }
    }
}

impl Config {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            duration_secs: self.duration_secs,
            max_tokens: self.max_tokens,
            ..SessionConfig::default()
        }
    }

    /// Build the corpus feed the settings describe.
    pub fn feed(&self) -> Result<Box<dyn CorpusFeed>, CorpusError> {
        let feed: Box<dyn CorpusFeed> = match self.corpus {
            CorpusKind::Words => Box::new(WordListFeed::with_round_size(
                WordList::new(&self.word_list)?,
                self.max_tokens,
            )?),
            CorpusKind::Quotes => Box::new(QuotationFeed::with_quotes_per_round(
                QuotationSet::new(&self.quote_set)?,
                self.quotes_per_round,
            )?),
        };
        Ok(feed)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "skilltest") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("skilltest_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(
                    "ignoring unreadable config {}: {err}",
                    self.path.display()
                );
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
