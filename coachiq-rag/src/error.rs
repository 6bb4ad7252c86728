//! Error types for the `coachiq-rag` crate.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while building or querying the retrieval pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// The uploaded document contained no text.
    #[error("uploaded document is empty")]
    EmptyInput,

    /// The uploaded bytes were not valid UTF-8.
    #[error("uploaded file is not valid UTF-8")]
    Decode(#[from] std::string::FromUtf8Error),

    /// A question was empty or whitespace-only.
    #[error("question must not be empty")]
    EmptyQuestion,

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An embedding's dimension differed from the index dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimension established by the first embedding.
        expected: usize,
        /// The offending dimension.
        actual: usize,
    },

    /// An index was built from zero segments.
    #[error("vector index must contain at least one segment")]
    EmptyIndex,

    /// The embedding provider failed in a way a retry cannot fix.
    #[error("embedding provider {provider} failed: {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedding provider did not respond within the configured timeout.
    #[error("embedding provider {provider} timed out after {elapsed:?}")]
    EmbeddingTimeout {
        /// The embedding provider that timed out.
        provider: String,
        /// The configured timeout that elapsed.
        elapsed: Duration,
    },

    /// The reasoning model failed in a way a retry cannot fix.
    #[error("reasoning model {provider} failed: {message}")]
    Reasoning {
        /// The reasoning model that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The reasoning model did not respond within the configured timeout.
    #[error("reasoning model {provider} timed out after {elapsed:?}")]
    ReasoningTimeout {
        /// The reasoning model that timed out.
        provider: String,
        /// The configured timeout that elapsed.
        elapsed: Duration,
    },

    /// A transport-level failure from an external service.
    ///
    /// Rate limits, 5xx responses, and connection failures land here so the
    /// retry policy can distinguish them from permanent failures.
    #[error("{provider} temporarily unavailable: {message}")]
    ServiceUnavailable {
        /// The service that was unavailable.
        provider: String,
        /// A description of the failure.
        message: String,
    },
}

impl RagError {
    /// Whether a bounded retry could plausibly succeed.
    ///
    /// Only timeouts and transport-level failures qualify; validation and
    /// consistency errors never do.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingTimeout { .. }
                | Self::ReasoningTimeout { .. }
                | Self::ServiceUnavailable { .. }
        )
    }
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
