//! Additive merge of two insertions at the same boundary.
//!
//! Two sides inserting different content at the same ancestor position do
//! not contradict each other. The inserted lists are diffed against each
//! other and the result keeps shared elements once and the exclusive
//! elements of both sides, `current` first.

use crate::diff::diff_by;
use crate::error::Result;
use crate::model::{Chunk, Delta, DeltaType, Patch};

/// Merges two inserted element lists into one.
///
/// Every CHANGE of the sub-diff becomes an insertion of the `next`
/// elements right after the `current` elements they replace, every
/// DELETE is dropped, and INSERTs are kept. The resulting patch is then
/// applied to `current`.
pub(crate) fn or_merge<E, F>(current: &[E], next: &[E], eq: &F) -> Result<Vec<E>>
where
    E: Clone,
    F: Fn(&E, &E) -> bool,
{
    let sub = diff_by(current, next, eq);

    let mut additions = Patch::new();
    for delta in sub {
        match delta.delta_type() {
            DeltaType::Change => {
                let position = delta.previous().position()? + delta.previous().size();
                additions.add_delta(Delta::insert(
                    Chunk::empty(position),
                    Chunk::new(position, delta.next().elements().to_vec()),
                ));
            }
            DeltaType::Insert => additions.add_delta(delta),
            DeltaType::Delete | DeltaType::Same => {}
        }
    }

    additions.apply_by(current, eq)
}
