//! Session: explicit per-upload state, from raw bytes to a ready router.
//!
//! A [`Session`] bundles the configuration, capability handles, built
//! index, and conversation history for one upload. It exists only after the
//! upload has been fully processed, so "ready to answer" is encoded by
//! construction rather than by a state flag.

use std::sync::Arc;

use coachiq_model::Llm;
use coachiq_rag::{
    Answer, AnswerEngine, Document, EmbeddingProvider, FixedSizeChunker, IngestPipeline, RagConfig,
};
use tracing::info;

use crate::error::{AgentError, Result};
use crate::router::{ConversationTurn, Router};
use crate::selector::{LlmToolSelector, ToolSelector};
use crate::tool::ToolRegistry;

/// One interactive session over one uploaded game log.
pub struct Session {
    config: RagConfig,
    router: Router,
}

impl Session {
    /// Create a new [`SessionBuilder`].
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Ask one question; returns the answer and records the turn.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        self.router.handle(question).await
    }

    /// A snapshot of the conversation so far.
    pub async fn history(&self) -> Vec<ConversationTurn> {
        self.router.history().await
    }

    /// The session configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }
}

/// Builder for opening a [`Session`] from an upload.
///
/// `config`, `embedder`, and `llm` are required; the selector defaults to
/// [`LlmToolSelector`] over the provided model and the registry defaults to
/// [`ToolRegistry::standard()`].
#[derive(Default)]
pub struct SessionBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    llm: Option<Arc<dyn Llm>>,
    selector: Option<Arc<dyn ToolSelector>>,
    registry: Option<ToolRegistry>,
}

impl SessionBuilder {
    /// Set the session configuration.
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

    /// Override the tool-selection strategy.
    pub fn selector(mut self, selector: Arc<dyn ToolSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Override the tool registry.
    pub fn registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Process an upload end to end and open the session.
    ///
    /// Decodes the bytes, chunks and embeds the text, builds the index, and
    /// wires up the router. Any failure aborts construction with
    /// [`AgentError::Upload`]; no session exists on failure.
    pub async fn open(self, upload: Vec<u8>) -> Result<Session> {
        let config = self.config.ok_or_else(|| upload_config_error("config is required"))?;
        let embedder = self.embedder.ok_or_else(|| upload_config_error("embedder is required"))?;
        let llm = self.llm.ok_or_else(|| upload_config_error("llm is required"))?;

        let document =
            Document::from_bytes("game_log", upload).map_err(|source| AgentError::Upload { source })?;

        let chunker = FixedSizeChunker::new(config.chunk_size, config.chunk_overlap)
            .map_err(|source| AgentError::Upload { source })?;
        let pipeline = IngestPipeline::builder()
            .config(config.clone())
            .chunker(Arc::new(chunker))
            .embedder(embedder.clone())
            .build()
            .map_err(|source| AgentError::Upload { source })?;

        let index = pipeline.ingest(&document).await.map_err(|source| AgentError::Upload { source })?;

        let engine = AnswerEngine::builder()
            .config(config.clone())
            .embedder(embedder)
            .llm(llm.clone())
            .build()
            .map_err(|source| AgentError::Upload { source })?;

        let selector = self
            .selector
            .unwrap_or_else(|| Arc::new(LlmToolSelector::new(llm, config.temperature)));
        let registry = self.registry.unwrap_or_else(ToolRegistry::standard);

        info!(segment_count = index.len(), "session ready");
        Ok(Session {
            config,
            router: Router::new(Arc::new(engine), Arc::new(index), registry, selector),
        })
    }
}

fn upload_config_error(message: &str) -> AgentError {
    AgentError::Upload { source: coachiq_rag::RagError::Config(message.to_string()) }
}
