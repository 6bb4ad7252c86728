//! In-memory vector index over one uploaded document.
//!
//! [`VectorIndex`] owns the (segment, embedding) pairs for a single upload.
//! It is built once, validated at build time, and read-only afterwards, so
//! queries take `&self` and the index can be shared freely.

use tracing::debug;

use crate::document::{SearchResult, Segment};
use crate::error::{RagError, Result};

/// A read-only nearest-neighbour index over embedded segments.
///
/// Similarity metric: cosine distance (`1 - cosine similarity`), in
/// `[0, 2]` for non-zero vectors. The same metric is implied for the query
/// vector, which must come from the same embedding model as the segments.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    segments: Vec<Segment>,
    dimensions: usize,
}

/// Cosine distance between two equal-length vectors.
///
/// Zero-magnitude vectors have undefined direction; they are treated as
/// orthogonal to everything (distance 1.0).
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

impl VectorIndex {
    /// Build an index from embedded segments.
    ///
    /// The first segment's embedding fixes the index dimension.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyIndex`] if `segments` is empty.
    /// - [`RagError::DimensionMismatch`] if any embedding's length differs
    ///   from the first.
    pub fn build(segments: Vec<Segment>) -> Result<Self> {
        let first = segments.first().ok_or(RagError::EmptyIndex)?;
        let dimensions = first.embedding.len();

        for segment in &segments {
            if segment.embedding.len() != dimensions {
                return Err(RagError::DimensionMismatch {
                    expected: dimensions,
                    actual: segment.embedding.len(),
                });
            }
        }

        debug!(segment_count = segments.len(), dimensions, "built vector index");
        Ok(Self { segments, dimensions })
    }

    /// Number of segments in the index.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: an index cannot be built from zero segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The embedding dimension this index was built with.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The indexed segments, in document order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Return the `top_k` segments closest to `embedding`.
    ///
    /// Results are sorted by ascending cosine distance; ties keep document
    /// order. If `top_k` exceeds the segment count, all segments are
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if the query vector's length
    /// differs from the index dimension.
    pub fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        if embedding.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .segments
            .iter()
            .enumerate()
            .map(|(i, segment)| (i, cosine_distance(&segment.embedding, embedding)))
            .collect();

        // Stable sort keeps document order for equal distances.
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(i, distance)| SearchResult { segment: self.segments[i].clone(), distance })
            .collect())
    }
}
