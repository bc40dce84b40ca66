use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::CorpusError;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// A fixed vocabulary the word-list strategy samples from.
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordList {
    /// Load an embedded list by name, e.g. `"english"`.
    pub fn new(name: &str) -> Result<Self, CorpusError> {
        read_embedded(name)
    }
}

/// A fixed set of quotations the quotation strategy shuffles and joins.
#[derive(Deserialize, Clone, Debug)]
pub struct QuotationSet {
    pub name: String,
    pub quotes: Vec<String>,
}

impl QuotationSet {
    pub fn new(name: &str) -> Result<Self, CorpusError> {
        read_embedded(name)
    }
}

fn read_embedded<T: DeserializeOwned>(name: &str) -> Result<T, CorpusError> {
    let file = LANG_DIR
        .get_file(format!("{name}.json"))
        .ok_or_else(|| CorpusError::UnknownSource(name.to_string()))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| CorpusError::NotUtf8(name.to_string()))?;

    serde_json::from_str(contents).map_err(|source| CorpusError::Malformed {
        name: name.to_string(),
        source,
    })
}
