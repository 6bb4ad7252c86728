//! Ingest pipeline: uploaded document → queryable index.
//!
//! [`IngestPipeline`] runs the upload half of the RAG flow: chunk the
//! document, batch-embed the segments, and build a [`VectorIndex`]. It is
//! run once per upload; a new upload builds a fresh index.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::Document;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// Base delay for exponential backoff between embedding retries.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// The upload-time pipeline: chunk → embed → index.
///
/// Construct one via [`IngestPipeline::builder()`].
pub struct IngestPipeline {
    config: RagConfig,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl IngestPipeline {
    /// Create a new [`IngestPipelineBuilder`].
    pub fn builder() -> IngestPipelineBuilder {
        IngestPipelineBuilder::default()
    }

    /// Build a [`VectorIndex`] from an uploaded document.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyInput`] for an empty document.
    /// - Embedding service errors once the retry budget is exhausted.
    /// - [`RagError::DimensionMismatch`] if the provider returns vectors of
    ///   inconsistent length.
    pub async fn ingest(&self, document: &Document) -> Result<VectorIndex> {
        let mut segments = self.chunker.chunk(document)?;

        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        let embeddings = self.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "embedding failed during ingest");
            e
        })?;

        for (segment, embedding) in segments.iter_mut().zip(embeddings) {
            segment.embedding = embedding;
        }

        let index = VectorIndex::build(segments)?;
        info!(
            document.id = %document.id,
            segment_count = index.len(),
            dimensions = index.dimensions(),
            "ingested document"
        );
        Ok(index)
    }

    /// Batch-embed with timeout and bounded retry on transient failures.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut attempt = 0;
        loop {
            let call = timeout(self.config.request_timeout, self.embedder.embed_batch(texts));
            let outcome = match call.await {
                Ok(result) => result,
                Err(_) => Err(RagError::EmbeddingTimeout {
                    provider: self.embedder.name().to_string(),
                    elapsed: self.config.request_timeout,
                }),
            };

            match outcome {
                Ok(vectors) => return Ok(vectors),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %e, "batch embedding failed, retrying");
                    tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Builder for constructing an [`IngestPipeline`].
#[derive(Default)]
pub struct IngestPipelineBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl IngestPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Build the [`IngestPipeline`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<IngestPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;
        let embedder =
            self.embedder.ok_or_else(|| RagError::Config("embedder is required".to_string()))?;
        Ok(IngestPipeline { config, chunker, embedder })
    }
}
