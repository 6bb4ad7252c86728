//! Answer engine: retrieval-grounded question answering.
//!
//! [`AnswerEngine`] composes an [`EmbeddingProvider`] and a reasoning model
//! ([`Llm`]) and answers a question against a [`VectorIndex`]: embed the
//! question, retrieve the closest segments, and ask the model with those
//! segments as grounding context.

use std::sync::Arc;
use std::time::Duration;

use coachiq_model::{ChatMessage, Llm};
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::config::RagConfig;
use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// Framing sent to the reasoning model ahead of the grounding context.
const GROUNDING_INSTRUCTION: &str = "You are a basketball tactical analyst. Answer the question \
     using only the game-log excerpts provided as context. If the context does not contain the \
     information needed, say so.";

/// Base delay for exponential backoff between retries.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// An answered question plus the segments that grounded it.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The model's answer text.
    pub text: String,
    /// Exactly the ordered retrieval results used as context.
    pub segments: Vec<SearchResult>,
}

/// The retrieval-augmented answer engine.
///
/// Stateless per question; the caller supplies the index. Construct one via
/// [`AnswerEngine::builder()`]. External calls are bounded by the configured
/// `request_timeout` and retried up to `max_retries` times, transient
/// failures only.
pub struct AnswerEngine {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn Llm>,
}

impl AnswerEngine {
    /// Create a new [`AnswerEngineBuilder`].
    pub fn builder() -> AnswerEngineBuilder {
        AnswerEngineBuilder::default()
    }

    /// Return a reference to the engine configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Answer `question` against `index`: embed → retrieve → reason.
    ///
    /// The returned [`Answer`] carries exactly the ordered retrieval
    /// results that were concatenated into the model's context.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyQuestion`] if `question` is empty or whitespace.
    /// - Embedding/reasoning service errors after the retry budget is
    ///   exhausted; index errors from [`VectorIndex::query`].
    pub async fn answer(&self, question: &str, index: &VectorIndex) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RagError::EmptyQuestion);
        }

        let query_embedding = self.embed_question(question).await?;
        let results = index.query(&query_embedding, self.config.top_k)?;

        let context: Vec<&str> = results.iter().map(|r| r.segment.text.as_str()).collect();
        let messages = [
            ChatMessage::system(GROUNDING_INSTRUCTION),
            ChatMessage::user(format!(
                "Context:\n{}\n\nQuestion: {question}",
                context.join("\n\n")
            )),
        ];

        let text = self.generate(&messages).await?;

        info!(
            question_len = question.len(),
            segment_count = results.len(),
            "answered question from retrieved context"
        );
        Ok(Answer { text, segments: results })
    }

    /// Embed the question with timeout and bounded retry.
    async fn embed_question(&self, question: &str) -> Result<Vec<f32>> {
        let mut attempt = 0;
        loop {
            let call = timeout(self.config.request_timeout, self.embedder.embed(question));
            let outcome = match call.await {
                Ok(result) => result,
                Err(_) => Err(RagError::EmbeddingTimeout {
                    provider: self.embedder.name().to_string(),
                    elapsed: self.config.request_timeout,
                }),
            };

            match outcome {
                Ok(vector) => return Ok(vector),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %e, "question embedding failed, retrying");
                    tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                }
                Err(e) => {
                    error!(error = %e, "question embedding failed");
                    return Err(e);
                }
            }
        }
    }

    /// Call the reasoning model with timeout and bounded retry.
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        let provider = self.llm.model_id().to_string();
        let mut attempt = 0;
        loop {
            let call = timeout(
                self.config.request_timeout,
                self.llm.generate(messages, self.config.temperature),
            );
            let outcome = match call.await {
                Ok(Ok(text)) => Ok(text),
                Ok(Err(e)) if e.is_transient() => Err(RagError::ServiceUnavailable {
                    provider: provider.clone(),
                    message: e.to_string(),
                }),
                Ok(Err(e)) => {
                    Err(RagError::Reasoning { provider: provider.clone(), message: e.to_string() })
                }
                Err(_) => Err(RagError::ReasoningTimeout {
                    provider: provider.clone(),
                    elapsed: self.config.request_timeout,
                }),
            };

            match outcome {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %e, "reasoning call failed, retrying");
                    tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                }
                Err(e) => {
                    error!(error = %e, "reasoning call failed");
                    return Err(e);
                }
            }
        }
    }
}

/// Builder for constructing an [`AnswerEngine`].
#[derive(Default)]
pub struct AnswerEngineBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    llm: Option<Arc<dyn Llm>>,
}

impl AnswerEngineBuilder {
    /// Set the engine configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the reasoning model.
    pub fn llm(mut self, llm: Arc<dyn Llm>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Build the [`AnswerEngine`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<AnswerEngine> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedder =
            self.embedder.ok_or_else(|| RagError::Config("embedder is required".to_string()))?;
        let llm = self.llm.ok_or_else(|| RagError::Config("llm is required".to_string()))?;
        Ok(AnswerEngine { config, embedder, llm })
    }
}
