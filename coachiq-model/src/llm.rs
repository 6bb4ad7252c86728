//! Reasoning-model capability interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The author of a [`ChatMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Framing instructions for the model.
    System,
    /// Input from the user (or from a component acting on their behalf).
    User,
    /// A previous reply from the model.
    Model,
}

/// One message in a generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// Create a model message.
    pub fn model(content: impl Into<String>) -> Self {
        Self { role: Role::Model, content: content.into() }
    }
}

/// A hosted reasoning model behind a unified async interface.
///
/// Implementations wrap specific backends (Gemini, a mock, etc.). Callers
/// own timeout and retry policy; implementations only report failures via
/// [`ModelError`](crate::ModelError).
#[async_trait]
pub trait Llm: Send + Sync {
    /// Generate a single text completion for the given message sequence.
    ///
    /// `temperature` controls sampling randomness; `0.0` is (near-)greedy.
    async fn generate(&self, messages: &[ChatMessage], temperature: f32) -> Result<String>;

    /// The identifier of the underlying model (e.g. `gemini-2.0-flash`).
    fn model_id(&self) -> &str;
}
