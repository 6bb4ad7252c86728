//! Document chunking.
//!
//! Provides the [`Chunker`] trait and [`FixedSizeChunker`], which splits a
//! game log into overlapping fixed-size windows by character count.

use crate::document::{Document, Segment};
use crate::error::{RagError, Result};

/// A strategy for splitting documents into segments.
///
/// Implementations produce [`Segment`]s with text and provenance but no
/// embeddings; embeddings are attached later by the ingest pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into ordered segments covering its full text.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyInput`] if the document text is empty.
    fn chunk(&self, document: &Document) -> Result<Vec<Segment>>;
}

/// Splits text into fixed-size windows by character count with overlap.
///
/// Each window holds at most `chunk_size` characters; each subsequent window
/// starts `chunk_size - chunk_overlap` characters after the previous one, so
/// consecutive segments share `chunk_overlap` characters. The final window
/// may be shorter. Windows are aligned to character boundaries, so multi-byte
/// text is never split mid-character.
///
/// Splitting is deterministic: for non-empty text the segment count is
/// `ceil((chars - overlap) / (chunk_size - overlap))` (one segment when the
/// text is no longer than `chunk_size`), and the segments cover the text
/// without gaps.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] unless `0 <= chunk_overlap < chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Result<Vec<Segment>> {
        let text = &document.text;
        if text.is_empty() {
            return Err(RagError::EmptyInput);
        }

        // Byte offset of every character, so windows land on char boundaries.
        let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let char_count = offsets.len();
        let step = self.chunk_size - self.chunk_overlap;

        let mut segments = Vec::new();
        let mut start = 0;
        let mut index = 0;

        loop {
            let end = (start + self.chunk_size).min(char_count);
            let byte_start = offsets[start];
            let byte_end = if end == char_count { text.len() } else { offsets[end] };

            segments.push(Segment {
                id: format!("{}_{index}", document.id),
                text: text[byte_start..byte_end].to_string(),
                embedding: Vec::new(),
                source_offset: byte_start,
                document_id: document.id.clone(),
            });

            if end == char_count {
                break;
            }
            start += step;
            index += 1;
        }

        Ok(segments)
    }
}
