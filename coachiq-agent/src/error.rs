//! Error types for the `coachiq-agent` crate.

use coachiq_rag::RagError;
use thiserror::Error;

/// Errors surfaced by the session and conversational router.
#[derive(Debug, Error)]
pub enum AgentError {
    /// A question was empty or whitespace-only.
    ///
    /// Raised before any embedding or reasoning call is made.
    #[error("question must not be empty")]
    EmptyQuestion,

    /// Upload processing failed; no session was created.
    #[error("upload failed: {source}")]
    Upload {
        /// The underlying pipeline failure.
        #[source]
        source: RagError,
    },

    /// A turn failed; the conversation history is unchanged.
    #[error("turn failed: {source}")]
    Turn {
        /// The underlying pipeline or service failure.
        #[source]
        source: RagError,
    },

    /// The tool-selection strategy failed or chose an unknown tool.
    #[error("tool selection failed: {0}")]
    Selection(String),
}

impl AgentError {
    /// Whether the session remains usable after this error.
    ///
    /// Turn-scoped failures leave the session ready for the next question;
    /// upload failures mean no session exists at all.
    pub fn is_turn_scoped(&self) -> bool {
        matches!(self, Self::EmptyQuestion | Self::Turn { .. } | Self::Selection(_))
    }
}

/// A convenience result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
