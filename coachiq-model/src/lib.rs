//! # coachiq-model
//!
//! Reasoning-model integrations for the CoachIQ tactical assistant.
//!
//! This crate defines the [`Llm`] capability interface the rest of the
//! workspace programs against, plus two implementations:
//!
//! - [`GeminiModel`] — Google's Gemini models via the Generative Language
//!   API (requires the `gemini` feature)
//! - [`MockLlm`] — a scripted model for deterministic tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coachiq_model::GeminiModel;
//!
//! let api_key = std::env::var("GOOGLE_API_KEY").unwrap();
//! let model = GeminiModel::new(&api_key, "gemini-2.0-flash")?;
//! let reply = model
//!     .generate(&[ChatMessage::user("What beats a fast break?")], 0.4)
//!     .await?;
//! ```

pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod llm;
pub mod mock;

pub use error::{ModelError, Result};
#[cfg(feature = "gemini")]
pub use gemini::GeminiModel;
pub use llm::{ChatMessage, Llm, Role};
pub use mock::MockLlm;
