//! Two-sequence diff.
//!
//! [`diff`] produces the canonical minimal [`Patch`] turning one sequence
//! into another. The alignment comes from a Myers shortest edit script, so
//! the patch has as few inserted plus deleted elements as possible, and
//! every gap between matched elements is reported as one delta.
//!
//! Equality is value equality by default; [`diff_by`] takes a
//! caller-supplied comparator instead.

mod generator;
mod myers;
mod result;

pub use result::DiffResult;

use tracing::debug;

use crate::diagnostics::DiagnosticLog;
use crate::model::{DeltaType, Patch};

/// Computes the patch turning `previous` into `next`.
pub fn diff<E>(previous: &[E], next: &[E]) -> Patch<E>
where
    E: Clone + PartialEq,
{
    diff_by(previous, next, |a, b| a == b)
}

/// Computes the patch turning `previous` into `next` with a custom
/// element equality.
pub fn diff_by<E, F>(previous: &[E], next: &[E], eq: F) -> Patch<E>
where
    E: Clone,
    F: Fn(&E, &E) -> bool,
{
    let patch = generator::generate(previous, next, eq);
    debug!(
        previous = previous.len(),
        next = next.len(),
        deltas = patch.len(),
        "computed patch"
    );
    patch
}

/// Diffs two sequences and wraps the patch with its inputs and a log.
pub fn diff_result<E>(previous: &[E], next: &[E]) -> DiffResult<E>
where
    E: Clone + PartialEq,
{
    let patch = diff(previous, next);

    let mut log = DiagnosticLog::new();
    if patch.is_empty() {
        log.info(None, "sequences are identical");
    } else {
        let count = |t: DeltaType| patch.iter().filter(|d| d.delta_type() == t).count();
        log.info(
            None,
            format!(
                "{} deltas: {} changed, {} deleted, {} inserted",
                patch.len(),
                count(DeltaType::Change),
                count(DeltaType::Delete),
                count(DeltaType::Insert)
            ),
        );
    }

    DiffResult::new(previous.to_vec(), next.to_vec(), patch, log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chunk, Delta};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_both_empty() {
        let patch = diff::<u8>(&[], &[]);
        assert!(patch.is_empty());
    }

    #[test]
    fn test_insert_everything() {
        let patch = diff(&[], &[1, 2, 3]);
        assert_eq!(
            patch.deltas(),
            &[Delta::insert(Chunk::empty(0), Chunk::new(0, vec![1, 2, 3]))]
        );
    }

    #[test]
    fn test_delete_everything() {
        let patch = diff(&[1, 2, 3], &[]);
        assert_eq!(
            patch.deltas(),
            &[Delta::delete(Chunk::new(0, vec![1, 2, 3]), Chunk::empty(0))]
        );
    }

    #[test]
    fn test_identical_sequences() {
        assert!(diff(&["a", "b"], &["a", "b"]).is_empty());
    }

    #[test]
    fn test_round_trip() {
        let previous = vec!["a", "b", "c", "e", "h", "j", "l", "m", "n", "p"];
        let next = vec!["b", "c", "d", "e", "f", "j", "k", "l", "m", "r", "s", "t"];

        let patch = diff(&previous, &next);
        assert_eq!(patch.apply(&previous).unwrap(), next);
        assert_eq!(patch.restore(&next).unwrap(), previous);
    }

    #[test]
    fn test_deterministic() {
        let previous: Vec<char> = "abracadabra".chars().collect();
        let next: Vec<char> = "cadabraabra".chars().collect();
        assert_eq!(diff(&previous, &next), diff(&previous, &next));
    }

    #[test]
    fn test_diff_by_ignores_case() {
        let patch = diff_by(&["Hello", "World"], &["hello", "world"], |a, b| {
            a.eq_ignore_ascii_case(b)
        });
        assert!(patch.is_empty());
    }

    #[test]
    fn test_diff_result_log() {
        let result = diff_result(&[1, 2, 3], &[1, 4, 3, 5]);
        assert_eq!(result.patch().len(), 2);
        assert_eq!(result.previous(), &[1, 2, 3]);
        assert_eq!(result.next(), &[1, 4, 3, 5]);
        assert!(!result.is_identical());
        assert_eq!(
            result.log().entries()[0].text,
            "2 deltas: 1 changed, 0 deleted, 1 inserted"
        );
    }
}
