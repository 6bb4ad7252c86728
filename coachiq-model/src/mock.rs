//! Scripted mock model for deterministic tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::llm::{ChatMessage, Llm};

/// An [`Llm`] that replays a scripted sequence of responses.
///
/// Each call to [`generate`](Llm::generate) pops the next scripted entry;
/// calling past the end of the script fails with
/// [`ModelError::InvalidResponse`]. The mock also records every request so
/// tests can assert on prompts and call counts.
///
/// # Example
///
/// ```rust,ignore
/// let llm = MockLlm::new()
///     .with_response("Press their guards full court.")
///     .with_error(ModelError::Server("boom".into()));
/// ```
pub struct MockLlm {
    script: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
    calls: AtomicUsize,
}

impl MockLlm {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a successful response.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.script.lock().expect("script lock").push_back(Ok(text.into()));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: ModelError) -> Self {
        self.script.lock().expect("script lock").push_back(Err(error));
        self
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The message sequences passed to `generate`, in call order.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Default for MockLlm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Llm for MockLlm {
    async fn generate(&self, messages: &[ChatMessage], _temperature: f32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("requests lock").push(messages.to_vec());
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::InvalidResponse("mock script exhausted".into())))
    }

    fn model_id(&self) -> &str {
        "mock-llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_in_order() {
        let llm = MockLlm::new()
            .with_response("first")
            .with_error(ModelError::Server("down".into()))
            .with_response("second");

        let msgs = [ChatMessage::user("q")];
        assert_eq!(llm.generate(&msgs, 0.0).await.unwrap(), "first");
        assert!(matches!(llm.generate(&msgs, 0.0).await, Err(ModelError::Server(_))));
        assert_eq!(llm.generate(&msgs, 0.0).await.unwrap(), "second");
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn exhausted_script_fails() {
        let llm = MockLlm::new();
        let err = llm.generate(&[ChatMessage::user("q")], 0.0).await.unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse(_)));
    }
}
