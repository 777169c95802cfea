//! Myers' O(ND) shortest edit script.
//!
//! The search is delegated to `similar`, which runs the linear-space
//! divide-and-conquer variant of "An O(ND) Difference Algorithm and Its
//! Variations" (Myers, 1986) and strips the common prefix and suffix
//! first. Memory stays proportional to `N + M` whatever the distance.
//! Caller-supplied equality reaches the search through [`ByEq`].

use std::convert::Infallible;

use similar::algorithms::{myers, DiffHook};

/// A single step of an edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edit {
    /// The elements at the current positions of both sequences are equal.
    Equal,
    /// The element at the current position of `a` is removed.
    Delete,
    /// The element at the current position of `b` is added.
    Insert,
}

/// Computes a shortest edit script turning `a` into `b`.
///
/// The script has exactly one [`Edit::Equal`] or [`Edit::Delete`] per
/// element of `a` and one [`Edit::Equal`] or [`Edit::Insert`] per element
/// of `b`, in sequence order.
pub(crate) fn edit_script<E, F>(a: &[E], b: &[E], eq: F) -> Vec<Edit>
where
    F: Fn(&E, &E) -> bool,
{
    let old: Vec<_> = a.iter().map(|item| ByEq { item, eq: &eq }).collect();
    let new: Vec<_> = b.iter().map(|item| ByEq { item, eq: &eq }).collect();

    let mut recorder = Recorder {
        script: Vec::with_capacity(a.len() + b.len()),
    };
    match myers::diff(&mut recorder, &old[..], 0..old.len(), &new[..], 0..new.len()) {
        Ok(()) => recorder.script,
        Err(never) => match never {},
    }
}

/// An element compared through the caller's equality.
struct ByEq<'a, E, F> {
    item: &'a E,
    eq: &'a F,
}

impl<E, F> PartialEq for ByEq<'_, E, F>
where
    F: Fn(&E, &E) -> bool,
{
    fn eq(&self, other: &Self) -> bool {
        (self.eq)(self.item, other.item)
    }
}

/// Flattens the hook callbacks into one step per element.
struct Recorder {
    script: Vec<Edit>,
}

impl Recorder {
    fn push(&mut self, edit: Edit, len: usize) {
        self.script.extend(std::iter::repeat(edit).take(len));
    }
}

impl DiffHook for Recorder {
    type Error = Infallible;

    fn equal(
        &mut self,
        _old_index: usize,
        _new_index: usize,
        len: usize,
    ) -> Result<(), Infallible> {
        self.push(Edit::Equal, len);
        Ok(())
    }

    fn delete(
        &mut self,
        _old_index: usize,
        old_len: usize,
        _new_index: usize,
    ) -> Result<(), Infallible> {
        self.push(Edit::Delete, old_len);
        Ok(())
    }

    fn insert(
        &mut self,
        _old_index: usize,
        _new_index: usize,
        new_len: usize,
    ) -> Result<(), Infallible> {
        self.push(Edit::Insert, new_len);
        Ok(())
    }
}
