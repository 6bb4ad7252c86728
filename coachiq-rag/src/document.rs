//! Data types for documents, segments, and retrieval results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One uploaded game log: the full text plus provenance metadata.
///
/// Created once per upload and immutable afterwards; the retrieval index is
/// always rebuilt from scratch rather than mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata associated with the document.
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Create a document from raw text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: HashMap::new() }
    }

    /// Decode an uploaded byte buffer as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Decode`](crate::RagError::Decode) if the bytes are
    /// not valid UTF-8.
    pub fn from_bytes(id: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let text = String::from_utf8(bytes)?;
        Ok(Self::new(id, text))
    }
}

/// A segment of a [`Document`] with its vector embedding.
///
/// Segments preserve document order and may overlap their neighbours by the
/// configured overlap width. `source_offset` is the byte offset of the
/// segment's first character in the source text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    /// Unique identifier, `{document_id}_{segment_index}`.
    pub id: String,
    /// The text content of the segment.
    pub text: String,
    /// The vector embedding for this segment's text.
    pub embedding: Vec<f32>,
    /// Byte offset of the segment start within the source document.
    pub source_offset: usize,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

/// A retrieved [`Segment`] paired with its distance to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved segment.
    pub segment: Segment,
    /// Cosine distance to the query vector (lower is more relevant).
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RagError;

    #[test]
    fn decodes_utf8_uploads() {
        let doc = Document::from_bytes("log", "Team X ran 12 fast breaks.".as_bytes().to_vec())
            .unwrap();
        assert_eq!(doc.id, "log");
        assert_eq!(doc.text, "Team X ran 12 fast breaks.");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = Document::from_bytes("log", vec![0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, RagError::Decode(_)));
    }
}
