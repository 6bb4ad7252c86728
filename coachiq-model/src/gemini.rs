//! Gemini reasoning model via the Generative Language API.
//!
//! This module is only available when the `gemini` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::llm::{ChatMessage, Llm, Role};

/// The default Generative Language API base URL.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// An [`Llm`] backed by the Gemini `generateContent` endpoint.
///
/// Uses `reqwest` to call the REST API directly. System messages are sent
/// as the request's `systemInstruction`; user and model messages become the
/// `contents` turn list.
///
/// # Example
///
/// ```rust,ignore
/// use coachiq_model::GeminiModel;
///
/// let model = GeminiModel::new("your-api-key", "gemini-2.0-flash")?;
/// let text = model.generate(&[ChatMessage::user("hello")], 0.4).await?;
/// ```
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    /// Create a new Gemini model client.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Auth`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ModelError::Auth("API key must not be empty".into()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            base_url: GEMINI_BASE_URL.into(),
        })
    }

    /// Override the API base URL (e.g. for a proxy or test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ── Generative Language API request/response types ─────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

/// Build the request body from a message sequence.
///
/// System messages are folded into `systemInstruction` (joined in order);
/// everything else becomes a `contents` turn with the Gemini role name.
fn build_request(messages: &[ChatMessage], temperature: f32) -> GenerateRequest {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let contents = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| Content {
            role: Some(match m.role {
                Role::Model => "model".to_string(),
                _ => "user".to_string(),
            }),
            parts: vec![Part { text: m.content.clone() }],
        })
        .collect();

    let system_instruction = if system.is_empty() {
        None
    } else {
        Some(Content { role: None, parts: vec![Part { text: system.join("\n") }] })
    };

    GenerateRequest {
        contents,
        system_instruction,
        generation_config: GenerationConfig { temperature },
    }
}

/// Extract the answer text from a parsed response.
fn extract_text(response: GenerateResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::InvalidResponse("response contained no candidates".into()))?;

    let text: String =
        candidate.content.parts.into_iter().map(|p| p.text).collect::<Vec<_>>().join("");

    if text.is_empty() {
        return Err(ModelError::InvalidResponse("candidate contained no text parts".into()));
    }
    Ok(text)
}

#[async_trait]
impl Llm for GeminiModel {
    async fn generate(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = build_request(messages, temperature);

        debug!(model = %self.model, turns = messages.len(), "calling generateContent");

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            error!(model = %self.model, error = %e, "generateContent transport failure");
            ModelError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(model = %self.model, status = status.as_u16(), "generateContent failed");
            return Err(ModelError::from_status(status.as_u16(), text));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("failed to parse response: {e}")))?;

        extract_text(parsed)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_messages_become_system_instruction() {
        let messages = [
            ChatMessage::system("You are a basketball analyst."),
            ChatMessage::user("How do we stop their fast break?"),
            ChatMessage::model("Fall back two guards."),
        ];
        let request = build_request(&messages, 0.4);

        let instruction = request.system_instruction.expect("system instruction");
        assert_eq!(instruction.parts[0].text, "You are a basketball analyst.");
        assert_eq!(request.contents.len(), 2);
        assert_eq!(request.contents[0].role.as_deref(), Some("user"));
        assert_eq!(request.contents[1].role.as_deref(), Some("model"));
    }

    #[test]
    fn parses_candidate_text() {
        let raw = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Run a 2-3 zone"}, {"text": " and crash the boards."}]}}
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_text(response).unwrap(), "Run a 2-3 zone and crash the boards.");
    }

    #[test]
    fn empty_candidates_is_invalid() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(extract_text(response), Err(ModelError::InvalidResponse(_))));
    }
}
