//! Ordered delta lists and their application.

use super::delta::Delta;
use crate::error::Result;

/// An ordered list of deltas transforming one sequence into another.
///
/// Deltas are kept ascending by `previous.index`. The ordering is a
/// precondition supplied by whoever builds the patch; diff always
/// produces ordered, non-overlapping deltas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Patch<E> {
    deltas: Vec<Delta<E>>,
}

impl<E> Default for Patch<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Patch<E> {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Patch { deltas: Vec::new() }
    }

    /// Creates a patch from deltas already in ascending order.
    pub fn from_deltas(deltas: Vec<Delta<E>>) -> Self {
        Patch { deltas }
    }

    /// Appends a delta.
    pub fn add_delta(&mut self, delta: Delta<E>) {
        self.deltas.push(delta);
    }

    /// Returns the deltas.
    pub fn deltas(&self) -> &[Delta<E>] {
        &self.deltas
    }

    /// Returns the number of deltas.
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Returns true if the patch has no deltas.
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Returns an iterator over the deltas.
    pub fn iter(&self) -> std::slice::Iter<'_, Delta<E>> {
        self.deltas.iter()
    }

    /// Converts the element type.
    pub fn map<U, F>(self, mut f: F) -> Patch<U>
    where
        F: FnMut(E) -> U,
    {
        Patch {
            deltas: self
                .deltas
                .into_iter()
                .map(|delta| delta.map(&mut f))
                .collect(),
        }
    }
}

impl<E: Clone> Patch<E> {
    /// Applies the patch to a copy of `target` using `eq` for verification.
    ///
    /// Deltas are applied from the highest index to the lowest so that no
    /// edit shifts a position a later edit still relies on.
    pub fn apply_by<F>(&self, target: &[E], eq: F) -> Result<Vec<E>>
    where
        F: Fn(&E, &E) -> bool,
    {
        let mut result = target.to_vec();
        for delta in self.deltas.iter().rev() {
            delta.apply_by(&mut result, &eq)?;
        }
        Ok(result)
    }

    /// Reverts the patch on a copy of `target` using `eq` for verification.
    pub fn restore_by<F>(&self, target: &[E], eq: F) -> Result<Vec<E>>
    where
        F: Fn(&E, &E) -> bool,
    {
        let mut result = target.to_vec();
        for delta in self.deltas.iter().rev() {
            delta.restore_by(&mut result, &eq)?;
        }
        Ok(result)
    }
}

impl<E: Clone + PartialEq> Patch<E> {
    /// Applies the patch to a copy of `target`.
    ///
    /// Fails without side effects if any delta does not match `target`.
    pub fn apply(&self, target: &[E]) -> Result<Vec<E>> {
        self.apply_by(target, |a, b| a == b)
    }

    /// Reverts the patch on a copy of `target`.
    pub fn restore(&self, target: &[E]) -> Result<Vec<E>> {
        self.restore_by(target, |a, b| a == b)
    }
}

impl<E> From<Vec<Delta<E>>> for Patch<E> {
    fn from(deltas: Vec<Delta<E>>) -> Self {
        Patch::from_deltas(deltas)
    }
}

impl<E> IntoIterator for Patch<E> {
    type Item = Delta<E>;
    type IntoIter = std::vec::IntoIter<Delta<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.deltas.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a Patch<E> {
    type Item = &'a Delta<E>;
    type IntoIter = std::slice::Iter<'a, Delta<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.deltas.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::Chunk;

    /// `[a, b, c, d, e]` -> `[x, b, d, e, f]`
    fn sample_patch() -> Patch<char> {
        Patch::from_deltas(vec![
            Delta::change(Chunk::new(0, vec!['a']), Chunk::new(0, vec!['x'])),
            Delta::delete(Chunk::new(2, vec!['c']), Chunk::empty(2)),
            Delta::insert(Chunk::empty(5), Chunk::new(4, vec!['f'])),
        ])
    }

    #[test]
    fn test_apply_in_descending_order() {
        let patch = sample_patch();
        let result = patch.apply(&['a', 'b', 'c', 'd', 'e']).unwrap();
        assert_eq!(result, vec!['x', 'b', 'd', 'e', 'f']);
    }

    #[test]
    fn test_restore() {
        let patch = sample_patch();
        let result = patch.restore(&['x', 'b', 'd', 'e', 'f']).unwrap();
        assert_eq!(result, vec!['a', 'b', 'c', 'd', 'e']);
    }

    #[test]
    fn test_failed_apply_leaves_target_untouched() {
        let patch = sample_patch();
        let target = vec!['a', 'b', 'q', 'd', 'e'];
        let err = patch.apply(&target).unwrap_err();
        assert!(matches!(err, Error::ContentMismatch { index: 2 }));
        assert_eq!(target, vec!['a', 'b', 'q', 'd', 'e']);
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let patch: Patch<u8> = Patch::new();
        assert!(patch.is_empty());
        assert_eq!(patch.apply(&[1, 2]).unwrap(), vec![1, 2]);
        assert_eq!(patch.restore(&[1, 2]).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_map_preserves_positions() {
        let patch = sample_patch().map(|c| c.to_ascii_uppercase());
        assert_eq!(patch.len(), 3);
        assert_eq!(patch.deltas()[0].next().elements(), &['X']);
        assert_eq!(patch.deltas()[2].source_index(), Some(5));
    }
}
