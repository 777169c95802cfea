//! Error types for seqmerge.

use thiserror::Error;

/// Result type alias for seqmerge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while applying patches or reading patch documents.
///
/// Merge conflicts are not errors; they are reported through
/// [`MergeResult::conflicts`](crate::MergeResult::conflicts).
#[derive(Error, Debug)]
pub enum Error {
    /// A chunk reaches past the end of the sequence it is checked against.
    #[error("Chunk at index {index} with {size} elements does not fit a sequence of length {len}")]
    ChunkOutOfBounds {
        /// Start index of the chunk.
        index: usize,
        /// Number of elements in the chunk.
        size: usize,
        /// Length of the target sequence.
        len: usize,
    },

    /// The target sequence holds different elements than the chunk.
    #[error("Chunk content does not match target at index {index}")]
    ContentMismatch {
        /// First index at which the target differs from the chunk.
        index: usize,
    },

    /// A positional operation was attempted on a detached chunk.
    #[error("Detached chunk has no position in the target sequence")]
    DetachedChunk,

    /// Patch document parsing error.
    #[error("Patch parse error: {0}")]
    Parse(String),

    /// The patch document was computed against a different source sequence.
    #[error("Patch digest mismatch: expected {expected}, found {actual}")]
    DigestMismatch {
        /// Digest recorded in the patch document.
        expected: String,
        /// Digest of the sequence the patch was applied to.
        actual: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
