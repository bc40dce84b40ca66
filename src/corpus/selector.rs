use super::{tokenize, CorpusError, CorpusFeed, QuotationSet, WordList, DEFAULT_ROUND_TOKENS};
use itertools::Itertools;
use log::debug;
use rand::seq::SliceRandom;

/// Quotations joined into one quotation-strategy round.
pub const DEFAULT_QUOTES_PER_ROUND: usize = 5;

/// Word-list strategy: a uniform permutation of the vocabulary, cut to the round size.
#[derive(Debug, Clone)]
pub struct WordListFeed {
    name: String,
    vocabulary: Vec<String>,
    words_per_round: usize,
}

impl WordListFeed {
    pub fn new(list: WordList) -> Result<Self, CorpusError> {
        Self::with_round_size(list, DEFAULT_ROUND_TOKENS)
    }

    pub fn with_round_size(list: WordList, words_per_round: usize) -> Result<Self, CorpusError> {
        let vocabulary = tokenize(list.words.iter().map(String::as_str));
        if vocabulary.is_empty() {
            return Err(CorpusError::EmptySource { name: list.name });
        }
        if words_per_round == 0 {
            return Err(CorpusError::InvalidMaxTokens);
        }

        Ok(Self {
            name: list.name,
            vocabulary,
            words_per_round,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl CorpusFeed for WordListFeed {
    fn next_round(&self, max_tokens: usize) -> Result<Vec<String>, CorpusError> {
        if max_tokens == 0 {
            return Err(CorpusError::InvalidMaxTokens);
        }

        let mut pool = self.vocabulary.clone();
        pool.shuffle(&mut rand::thread_rng());
        pool.truncate(self.words_per_round.min(max_tokens));

        debug!("drew {} words from '{}'", pool.len(), self.name);
        Ok(pool)
    }
}

/// Quotation strategy: shuffled quotations joined with single spaces, then split into words.
#[derive(Debug, Clone)]
pub struct QuotationFeed {
    name: String,
    quotes: Vec<String>,
    quotes_per_round: usize,
}

impl QuotationFeed {
    pub fn new(set: QuotationSet) -> Result<Self, CorpusError> {
        Self::with_quotes_per_round(set, DEFAULT_QUOTES_PER_ROUND)
    }

    pub fn with_quotes_per_round(
        set: QuotationSet,
        quotes_per_round: usize,
    ) -> Result<Self, CorpusError> {
        let quotes: Vec<String> = set
            .quotes
            .iter()
            .map(|q| q.split_whitespace().join(" "))
            .filter(|q| !q.is_empty())
            .collect();
        if quotes.is_empty() {
            return Err(CorpusError::EmptySource { name: set.name });
        }
        if quotes_per_round == 0 {
            return Err(CorpusError::InvalidMaxTokens);
        }

        Ok(Self {
            name: set.name,
            quotes,
            quotes_per_round,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl CorpusFeed for QuotationFeed {
    fn next_round(&self, max_tokens: usize) -> Result<Vec<String>, CorpusError> {
        if max_tokens == 0 {
            return Err(CorpusError::InvalidMaxTokens);
        }

        let mut order: Vec<&String> = self.quotes.iter().collect();
        order.shuffle(&mut rand::thread_rng());

        let text = order.into_iter().take(self.quotes_per_round).join(" ");
        let mut tokens = tokenize([text.as_str()]);
        tokens.truncate(max_tokens);

        debug!("drew {} quotation words from '{}'", tokens.len(), self.name);
        Ok(tokens)
    }
}
