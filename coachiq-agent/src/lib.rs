//! # coachiq-agent
//!
//! Conversational layer of the CoachIQ tactical assistant: a fixed registry
//! of analysis tools, a per-turn router that picks one (or answers
//! directly), and a session object tying configuration, capability handles,
//! index, and history together for one upload.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use coachiq_agent::Session;
//! use coachiq_rag::RagConfig;
//!
//! let session = Session::builder()
//!     .config(RagConfig::default())
//!     .embedder(embedder)
//!     .llm(llm)
//!     .open(std::fs::read("night_games.txt")?)
//!     .await?;
//!
//! let answer = session.ask("How can we beat Team X?").await?;
//! println!("{}", answer.text);
//! ```

pub mod error;
pub mod router;
pub mod selector;
pub mod session;
pub mod tool;

pub use error::{AgentError, Result};
pub use router::{ConversationTurn, Router};
pub use selector::{Decision, KeywordToolSelector, LlmToolSelector, ToolSelector};
pub use session::{Session, SessionBuilder};
pub use tool::{AnalysisTool, ToolRegistry};
