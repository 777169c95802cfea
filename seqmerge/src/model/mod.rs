//! The chunk/delta/patch data model.
//!
//! A [`Patch`] is an ordered list of [`Delta`]s; each delta pairs a
//! [`Chunk`] of the source sequence with a chunk of the target sequence.
//! Patches can be applied to the source to obtain the target, and
//! restored on the target to recover the source. Both directions verify
//! the stored chunks against the sequence they are applied to.

mod chunk;
mod delta;
mod patch;

pub use chunk::Chunk;
pub use delta::{Delta, DeltaType};
pub use patch::Patch;
