pub mod embedded;
pub mod fixed;
pub mod layout;
pub mod selector;

// Re-export the main types for convenience
pub use embedded::{QuotationSet, WordList};
pub use fixed::FixedFeed;
pub use selector::{QuotationFeed, WordListFeed};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of tokens a word-list round holds: three display lines of twenty words.
pub const DEFAULT_ROUND_TOKENS: usize = 60;

/// Errors raised while loading or sampling a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The vocabulary or quotation set contains no usable token.
    #[error("corpus '{name}' has no usable words")]
    EmptySource { name: String },

    /// No embedded corpus file carries this name.
    #[error("unknown corpus '{0}'")]
    UnknownSource(String),

    /// The embedded file is not valid UTF-8.
    #[error("corpus '{0}' is not valid utf-8")]
    NotUtf8(String),

    /// The embedded file does not deserialize.
    #[error("corpus '{name}' is malformed: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A round was requested with room for zero tokens.
    #[error("a round must allow at least one token")]
    InvalidMaxTokens,
}

/// Supplies the word tokens for one round of text.
///
/// Every successful round is non-empty, holds at most `max_tokens` entries,
/// and each token is a non-empty string without whitespace. Calling it again
/// draws a fresh round and leaves earlier rounds untouched.
pub trait CorpusFeed {
    fn next_round(&self, max_tokens: usize) -> Result<Vec<String>, CorpusError>;
}

/// Which sampling strategy feeds the session
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum CorpusKind {
    #[default]
    Words,
    Quotes,
}

/// Split raw entries on whitespace, dropping anything empty.
pub(crate) fn tokenize<'a, I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    entries
        .into_iter()
        .flat_map(str::split_whitespace)
        .map(str::to_owned)
        .collect()
}
