//! Gemini embedding provider via the Generative Language API.
//!
//! This module is only available when the `gemini` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default Generative Language API base URL.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default embedding model.
const DEFAULT_MODEL: &str = "gemini-embedding-001";

/// The default dimensionality for `gemini-embedding-001`.
const DEFAULT_DIMENSIONS: usize = 3072;

/// An [`EmbeddingProvider`] backed by the Gemini `embedContent` endpoints.
///
/// Uses `reqwest` to call the REST API directly; batch requests go through
/// `batchEmbedContents` in a single round trip.
///
/// # Example
///
/// ```rust,ignore
/// use coachiq_rag::gemini::GeminiEmbeddingProvider;
///
/// let provider = GeminiEmbeddingProvider::new("your-api-key")?;
/// let embedding = provider.embed("pick and roll coverage").await?;
/// ```
pub struct GeminiEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    dimensions: usize,
    /// If set, asks the API to truncate output vectors to this size.
    output_dimensionality: Option<usize>,
}

impl GeminiEmbeddingProvider {
    /// Create a new provider with the default model and dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Embedding {
                provider: "Gemini".into(),
                message: "API key must not be empty".into(),
            });
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            base_url: GEMINI_BASE_URL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            output_dimensionality: None,
        })
    }

    /// Set the embedding model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (e.g. for a proxy or test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Truncate output vectors to `dims` (also updates `dimensions()`).
    pub fn with_output_dimensionality(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.output_dimensionality = Some(dims);
        self
    }

    fn request_for(&self, text: &str) -> EmbedRequest {
        EmbedRequest {
            model: format!("models/{}", self.model),
            content: EmbedContent { parts: vec![EmbedPart { text: text.to_string() }] },
            output_dimensionality: self.output_dimensionality,
        }
    }

    /// Map a failed HTTP response to a `RagError`.
    ///
    /// Rate limits and 5xx responses are transient (`ServiceUnavailable`);
    /// everything else is a permanent embedding failure.
    fn status_error(&self, status: u16, body: String) -> RagError {
        if status == 429 || (500..=599).contains(&status) {
            RagError::ServiceUnavailable {
                provider: format!("Gemini ({})", self.model),
                message: format!("HTTP {status}: {body}"),
            }
        } else {
            RagError::Embedding {
                provider: format!("Gemini ({})", self.model),
                message: format!("HTTP {status}: {body}"),
            }
        }
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R> {
        let url =
            format!("{}/models/{}:{endpoint}?key={}", self.base_url, self.model, self.api_key);

        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            error!(model = %self.model, error = %e, "embedding transport failure");
            RagError::ServiceUnavailable {
                provider: format!("Gemini ({})", self.model),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(model = %self.model, status = status.as_u16(), "embedding request failed");
            return Err(self.status_error(status.as_u16(), body));
        }

        response.json().await.map_err(|e| RagError::Embedding {
            provider: format!("Gemini ({})", self.model),
            message: format!("failed to parse response: {e}"),
        })
    }
}

// ── Generative Language API request/response types ─────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest {
    model: String,
    content: EmbedContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dimensionality: Option<usize>,
}

#[derive(Serialize)]
struct EmbedContent {
    parts: Vec<EmbedPart>,
}

#[derive(Serialize)]
struct EmbedPart {
    text: String,
}

#[derive(Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(model = %self.model, text_len = text.len(), "embedding single text");
        let response: EmbedResponse = self.post("embedContent", &self.request_for(text)).await?;
        Ok(response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(model = %self.model, batch_size = texts.len(), "embedding batch");
        let body =
            BatchEmbedRequest { requests: texts.iter().map(|t| self.request_for(t)).collect() };
        let response: BatchEmbedResponse = self.post("batchEmbedContents", &body).await?;

        if response.embeddings.len() != texts.len() {
            return Err(RagError::Embedding {
                provider: format!("Gemini ({})", self.model),
                message: format!(
                    "batch returned {} embeddings for {} inputs",
                    response.embeddings.len(),
                    texts.len()
                ),
            });
        }
        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }
}
