use thiserror::Error;

/// Failure taxonomy for a single file's conversion. Every variant is scoped
/// to the file being processed; none of them should abort a batch.
#[derive(Debug, Error)]
pub enum Error {
    /// No anchor pattern matched anywhere in the normalized text. Retrying
    /// the parse cannot change the outcome.
    #[error("no array literal anchor found in input")]
    SpanNotFound,

    /// Every strategy in the chain returned an empty record.
    #[error("no extraction strategy produced a record")]
    StrategyExhausted,

    /// The record violates the output validator's bounds and must not be
    /// persisted.
    #[error("output validation failed: {0}")]
    Validation(String),

    /// The persisted artifact does not match the parsed record. Terminal
    /// for the file; never retried automatically.
    #[error("integrity verification failed: {0}")]
    Integrity(String),

    /// A strategy exceeded its scan step budget and was abandoned.
    #[error("scan step budget exhausted")]
    BudgetExhausted,

    /// Underlying read/write failure.
    #[error("resource error: {0}")]
    Resource(#[from] std::io::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Error::Integrity(message.into())
    }

    /// Whether retrying the same parse could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::StrategyExhausted | Error::BudgetExhausted)
    }
}
