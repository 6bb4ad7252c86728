//! Error types for the `coachiq-model` crate.

use thiserror::Error;

/// Errors produced by reasoning-model backends.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The backend rejected the request credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The backend rate-limited the request.
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    /// The backend reported a server-side failure.
    #[error("server error: {0}")]
    Server(String),

    /// The response could not be parsed into an answer.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The HTTP transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ModelError {
    /// Map an HTTP status code and body excerpt to a `ModelError`.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Auth(message),
            429 => Self::RateLimited(message),
            500..=599 => Self::Server(message),
            _ => Self::InvalidResponse(message),
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Rate limits, server-side failures, and transport failures are
    /// transient; authentication and malformed-response failures are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Server(_) | Self::Transport(_))
    }
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(ModelError::from_status(401, "bad key"), ModelError::Auth(_)));
        assert!(matches!(ModelError::from_status(403, "forbidden"), ModelError::Auth(_)));
        assert!(matches!(ModelError::from_status(429, "slow down"), ModelError::RateLimited(_)));
        assert!(matches!(ModelError::from_status(503, "overloaded"), ModelError::Server(_)));
        assert!(matches!(ModelError::from_status(400, "bad body"), ModelError::InvalidResponse(_)));
    }

    #[test]
    fn transient_classification() {
        assert!(ModelError::RateLimited("x".into()).is_transient());
        assert!(ModelError::Server("x".into()).is_transient());
        assert!(ModelError::Transport("x".into()).is_transient());
        assert!(!ModelError::Auth("x".into()).is_transient());
        assert!(!ModelError::InvalidResponse("x".into()).is_transient());
    }
}
