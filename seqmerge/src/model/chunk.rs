//! Positioned runs of elements.

use crate::error::{Error, Result};

/// A contiguous run of elements together with its start index in some
/// reference sequence.
///
/// A chunk may also be *detached*: it carries elements but no position.
/// Detached chunks describe edits without positional meaning and refuse
/// every positional operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chunk<E> {
    /// Start index, or `None` when detached.
    index: Option<usize>,
    /// The elements of the run.
    elements: Vec<E>,
}

impl<E> Chunk<E> {
    /// Creates a chunk starting at `index`.
    pub fn new(index: usize, elements: Vec<E>) -> Self {
        Chunk {
            index: Some(index),
            elements,
        }
    }

    /// Creates an empty chunk marking a position.
    pub fn empty(index: usize) -> Self {
        Chunk::new(index, Vec::new())
    }

    /// Creates a chunk without a position.
    pub fn detached(elements: Vec<E>) -> Self {
        Chunk {
            index: None,
            elements,
        }
    }

    /// Returns the start index, or `None` for a detached chunk.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Returns true if this chunk has no position.
    pub fn is_detached(&self) -> bool {
        self.index.is_none()
    }

    /// Returns the start index or fails for a detached chunk.
    pub fn position(&self) -> Result<usize> {
        self.index.ok_or(Error::DetachedChunk)
    }

    /// Returns the elements of the chunk.
    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// Consumes the chunk and returns its elements.
    pub fn into_elements(self) -> Vec<E> {
        self.elements
    }

    /// Returns the number of elements.
    pub fn size(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the chunk holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the index one past the last element.
    ///
    /// `None` for a detached chunk or when the end does not fit in `usize`.
    pub fn end(&self) -> Option<usize> {
        self.index.and_then(|index| index.checked_add(self.size()))
    }

    /// Returns the index of the last element.
    ///
    /// Empty and detached chunks have no last element.
    pub fn last_index(&self) -> Option<usize> {
        self.end().and_then(|end| end.checked_sub(1)).filter(|_| !self.is_empty())
    }

    /// Returns true if the two chunks share or border on a position.
    ///
    /// Adjacent chunks overlap: two edits that touch cannot be applied
    /// independently of each other.
    pub fn overlaps(&self, other: &Chunk<E>) -> bool {
        match (self.index, self.end(), other.index, other.end()) {
            (Some(start), Some(end), Some(other_start), Some(other_end)) => {
                start <= other_end && other_start <= end
            }
            _ => false,
        }
    }

    /// Converts the element type.
    pub fn map<U, F>(self, f: F) -> Chunk<U>
    where
        F: FnMut(E) -> U,
    {
        Chunk {
            index: self.index,
            elements: self.elements.into_iter().map(f).collect(),
        }
    }

    /// Checks that `target` holds this chunk's elements at its position.
    pub fn verify_by<F>(&self, target: &[E], eq: F) -> Result<()>
    where
        F: Fn(&E, &E) -> bool,
    {
        let index = self.position()?;
        let out_of_bounds = || Error::ChunkOutOfBounds {
            index,
            size: self.size(),
            len: target.len(),
        };
        let end = index.checked_add(self.size()).ok_or_else(out_of_bounds)?;
        if end > target.len() {
            return Err(out_of_bounds());
        }

        match self
            .elements
            .iter()
            .zip(&target[index..end])
            .position(|(expected, actual)| !eq(expected, actual))
        {
            Some(offset) => Err(Error::ContentMismatch {
                index: index + offset,
            }),
            None => Ok(()),
        }
    }
}

impl<E: PartialEq> Chunk<E> {
    /// Checks that `target` holds this chunk's elements at its position.
    pub fn verify(&self, target: &[E]) -> Result<()> {
        self.verify_by(target, |a, b| a == b)
    }
}
