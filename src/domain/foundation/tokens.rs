//! Token estimation utilities.
//!
//! Deterministic chars/4 approximation of sub-word token cost. The count
//! is a budgeting heuristic, not a tokenizer: it only needs to be
//! monotonic with text length and reproducible for identical input.

/// Approximate characters per token for chat models.
pub const CHARS_PER_TOKEN: usize = 4;

/// Deterministic token-count estimator shared by every budgeting decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenEstimator;

impl TokenEstimator {
    /// Creates a new estimator.
    pub fn new() -> Self {
        Self
    }

    /// Estimates the token cost of a piece of text.
    pub fn count(&self, text: &str) -> u32 {
        (text.len().div_ceil(CHARS_PER_TOKEN)) as u32
    }

    /// Estimates the total token cost of several texts.
    pub fn count_all<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> u32 {
        texts.into_iter().map(|t| self.count(t)).sum()
    }
}
