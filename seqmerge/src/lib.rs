//! seqmerge - Sequence Diff and Three-way Merge
//!
//! This library computes differences between ordered sequences and merges
//! two edited versions of a sequence against their common ancestor.
//!
//! # Overview
//!
//! - [`diff`] turns two sequences into a [`Patch`]: an ordered list of
//!   [`Delta`]s, each replacing, removing or adding a [`Chunk`] of
//!   elements. The alignment is a Myers shortest edit script.
//! - [`Patch::apply`] and [`Patch::restore`] replay a patch forwards or
//!   backwards, verifying every chunk against the target first.
//! - [`merge`] reconciles `current` and `next` with their `ancestor`.
//!   Overlapping edits become [`Conflict`]s that are resolved by the
//!   configured [`Fallback`] or by [`ConflictDecision`]s, so a merge always
//!   yields a usable sequence.
//!
//! Elements are generic. Equality defaults to [`PartialEq`]; every entry
//! point has a `_by` variant taking a comparator instead. The [`text`]
//! module runs the engine on lines or words, and [`xml`] stores string
//! patches as XML documents.
//!
//! # Example
//!
//! ```
//! use seqmerge::{merge, MergeConfig};
//!
//! let ancestor = ["a", "b", "c", "d"];
//! let current = ["A", "b", "c", "d"];
//! let next = ["a", "b", "c", "D"];
//!
//! let result = merge(&ancestor, &current, &next, &MergeConfig::default()).unwrap();
//! assert_eq!(result.merged(), &["A", "b", "c", "D"]);
//! assert!(!result.has_conflicts());
//! ```

pub mod diagnostics;
pub mod diff;
pub mod error;
pub mod merge;
pub mod model;
pub mod text;
pub mod xml;

// Re-export commonly used types
pub use diagnostics::{DiagnosticLog, LogEntry, Severity};
pub use error::{Error, Result};
pub use model::{Chunk, Delta, DeltaType, Patch};

// Re-export diff types
pub use diff::{diff, diff_by, diff_result, DiffResult};

// Re-export merge types
pub use merge::{
    merge, Conflict, ConflictDecision, DecisionType, Fallback, MergeConfig, MergeEngine,
    MergeResult,
};

pub use xml::{PatchDocument, PatchParser, PatchPrinter};
