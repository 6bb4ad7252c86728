//! # coachiq-rag
//!
//! Retrieval-augmented answering pipeline for the CoachIQ tactical
//! assistant: split an uploaded game log into overlapping segments, embed
//! them, index them for nearest-neighbour search, and answer questions
//! grounded in the retrieved segments.
//!
//! ## Overview
//!
//! - [`FixedSizeChunker`] splits the upload into overlapping windows
//! - [`EmbeddingProvider`] is the injected embedding capability
//! - [`VectorIndex`] is the build-once, read-only similarity index
//! - [`IngestPipeline`] runs chunk → embed → index per upload
//! - [`AnswerEngine`] runs embed → retrieve → reason per question
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use coachiq_rag::{
//!     AnswerEngine, Document, FixedSizeChunker, IngestPipeline, RagConfig,
//! };
//!
//! let config = RagConfig::default();
//! let pipeline = IngestPipeline::builder()
//!     .config(config.clone())
//!     .chunker(Arc::new(FixedSizeChunker::new(1000, 100)?))
//!     .embedder(embedder.clone())
//!     .build()?;
//!
//! let document = Document::from_bytes("game_log", upload_bytes)?;
//! let index = pipeline.ingest(&document).await?;
//!
//! let engine = AnswerEngine::builder()
//!     .config(config)
//!     .embedder(embedder)
//!     .llm(llm)
//!     .build()?;
//! let answer = engine.answer("What is Team X's weakness?", &index).await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod engine;
pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod index;
pub mod pipeline;

pub use chunking::{Chunker, FixedSizeChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Document, SearchResult, Segment};
pub use embedding::EmbeddingProvider;
pub use engine::{Answer, AnswerEngine, AnswerEngineBuilder};
pub use error::{RagError, Result};
#[cfg(feature = "gemini")]
pub use gemini::GeminiEmbeddingProvider;
pub use index::VectorIndex;
pub use pipeline::{IngestPipeline, IngestPipelineBuilder};
