//! Patch generation from an edit script.
//!
//! Consecutive non-equal steps of the script form one gap between two
//! matched elements. Each gap becomes exactly one delta: DELETE when it
//! only removes, INSERT when it only adds and CHANGE when it does both.

use super::myers::{edit_script, Edit};
use crate::model::{Chunk, Delta, Patch};

/// A gap between matched elements, tracked while walking the script.
struct Gap {
    /// Start of the gap in the previous sequence.
    previous_start: usize,
    /// Start of the gap in the next sequence.
    next_start: usize,
    /// Number of removed elements.
    deleted: usize,
    /// Number of added elements.
    inserted: usize,
}

impl Gap {
    fn new(previous_start: usize, next_start: usize) -> Self {
        Gap {
            previous_start,
            next_start,
            deleted: 0,
            inserted: 0,
        }
    }

    fn into_delta<E: Clone>(self, previous: &[E], next: &[E]) -> Delta<E> {
        let old = Chunk::new(
            self.previous_start,
            previous[self.previous_start..self.previous_start + self.deleted].to_vec(),
        );
        let new = Chunk::new(
            self.next_start,
            next[self.next_start..self.next_start + self.inserted].to_vec(),
        );

        match (self.deleted, self.inserted) {
            (_, 0) => Delta::delete(old, new),
            (0, _) => Delta::insert(old, new),
            _ => Delta::change(old, new),
        }
    }
}

/// Generates the patch turning `previous` into `next`.
pub(crate) fn generate<E, F>(previous: &[E], next: &[E], eq: F) -> Patch<E>
where
    E: Clone,
    F: Fn(&E, &E) -> bool,
{
    let mut patch = Patch::new();

    match (previous.is_empty(), next.is_empty()) {
        (true, true) => return patch,
        (true, false) => {
            patch.add_delta(Delta::insert(Chunk::empty(0), Chunk::new(0, next.to_vec())));
            return patch;
        }
        (false, true) => {
            patch.add_delta(Delta::delete(Chunk::new(0, previous.to_vec()), Chunk::empty(0)));
            return patch;
        }
        (false, false) => {}
    }

    let (mut i, mut j) = (0, 0);
    let mut gap: Option<Gap> = None;

    for edit in edit_script(previous, next, eq) {
        match edit {
            Edit::Equal => {
                if let Some(done) = gap.take() {
                    patch.add_delta(done.into_delta(previous, next));
                }
                i += 1;
                j += 1;
            }
            Edit::Delete => {
                gap.get_or_insert_with(|| Gap::new(i, j)).deleted += 1;
                i += 1;
            }
            Edit::Insert => {
                gap.get_or_insert_with(|| Gap::new(i, j)).inserted += 1;
                j += 1;
            }
        }
    }

    if let Some(done) = gap {
        patch.add_delta(done.into_delta(previous, next));
    }

    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeltaType;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn generate_chars(a: &str, b: &str) -> Patch<char> {
        generate(&chars(a), &chars(b), |x, y| x == y)
    }

    #[test]
    fn test_interleaved_gap_fuses_into_change() {
        let patch = generate_chars("abcd", "axyd");
        assert_eq!(patch.len(), 1);

        let delta = &patch.deltas()[0];
        assert_eq!(delta.delta_type(), DeltaType::Change);
        assert_eq!(delta.previous(), &Chunk::new(1, chars("bc")));
        assert_eq!(delta.next(), &Chunk::new(1, chars("xy")));
    }

    #[test]
    fn test_pure_delete_and_insert() {
        let patch = generate_chars("abcde", "acdef");
        assert_eq!(patch.len(), 2);
        assert_eq!(patch.deltas()[0].delta_type(), DeltaType::Delete);
        assert_eq!(patch.deltas()[0].previous(), &Chunk::new(1, chars("b")));
        assert_eq!(patch.deltas()[0].next(), &Chunk::empty(1));
        assert_eq!(patch.deltas()[1].delta_type(), DeltaType::Insert);
        assert_eq!(patch.deltas()[1].previous(), &Chunk::empty(5));
        assert_eq!(patch.deltas()[1].next(), &Chunk::new(4, chars("f")));
    }

    #[test]
    fn test_deltas_ascend_and_never_touch() {
        let patch = generate_chars("the quick brown fox", "a quick red fox jumps");
        for pair in patch.deltas().windows(2) {
            assert!(pair[0].source_end() < pair[1].source_index());
        }
    }
}
