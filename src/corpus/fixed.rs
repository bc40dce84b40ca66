use super::{tokenize, CorpusError, CorpusFeed};

/// Feed that hands out the same tokens every round.
///
/// Handy for headless drivers and tests where the target words must be known
/// up front.
#[derive(Debug, Clone)]
pub struct FixedFeed {
    tokens: Vec<String>,
}

impl FixedFeed {
    pub fn new<'a, I>(words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            tokens: tokenize(words),
        }
    }
}

impl CorpusFeed for FixedFeed {
    fn next_round(&self, max_tokens: usize) -> Result<Vec<String>, CorpusError> {
        if max_tokens == 0 {
            return Err(CorpusError::InvalidMaxTokens);
        }
        if self.tokens.is_empty() {
            return Err(CorpusError::EmptySource {
                name: "fixed".to_string(),
            });
        }

        Ok(self.tokens.iter().take(max_tokens).cloned().collect())
    }
}
