//! Single edit operations between two chunks.

use super::chunk::Chunk;
use crate::error::{Error, Result};

/// Kinds of edit a [`Delta`] can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeltaType {
    /// A region of the source is replaced by different elements.
    Change,
    /// A region of the source is removed.
    Delete,
    /// Elements are added at a position of the source.
    Insert,
    /// An explicitly unchanged region. Never produced by diff.
    Same,
}

impl DeltaType {
    /// Returns the tag name for this delta type.
    pub fn tag_name(&self) -> &'static str {
        match self {
            DeltaType::Change => "change",
            DeltaType::Delete => "delete",
            DeltaType::Insert => "insert",
            DeltaType::Same => "same",
        }
    }

    /// Parses a tag name produced by [`DeltaType::tag_name`].
    pub fn from_tag_name(name: &str) -> Option<Self> {
        match name {
            "change" => Some(DeltaType::Change),
            "delete" => Some(DeltaType::Delete),
            "insert" => Some(DeltaType::Insert),
            "same" => Some(DeltaType::Same),
            _ => None,
        }
    }
}

/// One edit operation.
///
/// `previous` locates the affected region in the source sequence and
/// `next` locates its replacement in the target sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delta<E> {
    delta_type: DeltaType,
    previous: Chunk<E>,
    next: Chunk<E>,
}

impl<E> Delta<E> {
    /// Creates a delta of the given type.
    pub fn new(delta_type: DeltaType, previous: Chunk<E>, next: Chunk<E>) -> Self {
        Delta {
            delta_type,
            previous,
            next,
        }
    }

    /// Creates a CHANGE delta.
    pub fn change(previous: Chunk<E>, next: Chunk<E>) -> Self {
        Delta::new(DeltaType::Change, previous, next)
    }

    /// Creates a DELETE delta.
    pub fn delete(previous: Chunk<E>, next: Chunk<E>) -> Self {
        Delta::new(DeltaType::Delete, previous, next)
    }

    /// Creates an INSERT delta.
    pub fn insert(previous: Chunk<E>, next: Chunk<E>) -> Self {
        Delta::new(DeltaType::Insert, previous, next)
    }

    /// Creates a SAME placeholder.
    pub fn same(previous: Chunk<E>, next: Chunk<E>) -> Self {
        Delta::new(DeltaType::Same, previous, next)
    }

    /// Returns the type of this delta.
    pub fn delta_type(&self) -> DeltaType {
        self.delta_type
    }

    /// Returns the chunk in the source sequence.
    pub fn previous(&self) -> &Chunk<E> {
        &self.previous
    }

    /// Returns the chunk in the target sequence.
    pub fn next(&self) -> &Chunk<E> {
        &self.next
    }

    /// Replaces the source chunk.
    pub fn set_previous(&mut self, previous: Chunk<E>) {
        self.previous = previous;
    }

    /// Replaces the target chunk.
    pub fn set_next(&mut self, next: Chunk<E>) {
        self.next = next;
    }

    /// Returns true for INSERT deltas.
    pub fn is_insert(&self) -> bool {
        self.delta_type == DeltaType::Insert
    }

    /// Returns the source position this delta starts at.
    pub fn source_index(&self) -> Option<usize> {
        self.previous.index()
    }

    /// Returns the source position one past the consumed region.
    pub fn source_end(&self) -> Option<usize> {
        self.previous.end()
    }

    /// Compares two deltas with a caller-supplied element equality.
    pub fn eq_by<F>(&self, other: &Delta<E>, eq: F) -> bool
    where
        F: Fn(&E, &E) -> bool,
    {
        self.delta_type == other.delta_type
            && chunk_eq_by(&self.previous, &other.previous, &eq)
            && chunk_eq_by(&self.next, &other.next, &eq)
    }

    /// Converts the element type.
    pub fn map<U, F>(self, mut f: F) -> Delta<U>
    where
        F: FnMut(E) -> U,
    {
        Delta {
            delta_type: self.delta_type,
            previous: self.previous.map(&mut f),
            next: self.next.map(&mut f),
        }
    }

    /// Checks that this delta can be applied to `target`.
    pub fn verify_by<F>(&self, target: &[E], eq: F) -> Result<()>
    where
        F: Fn(&E, &E) -> bool,
    {
        match self.delta_type {
            DeltaType::Change | DeltaType::Delete => self.previous.verify_by(target, eq),
            DeltaType::Insert => check_position(&self.previous, target.len()).map(|_| ()),
            DeltaType::Same => Ok(()),
        }
    }
}

impl<E: Clone> Delta<E> {
    /// Applies this delta to `target` in place.
    ///
    /// The target must still be indexed like the source sequence at and
    /// before `previous.index`.
    pub fn apply_by<F>(&self, target: &mut Vec<E>, eq: F) -> Result<()>
    where
        F: Fn(&E, &E) -> bool,
    {
        match self.delta_type {
            DeltaType::Change => {
                self.previous.verify_by(target, eq)?;
                let index = self.previous.position()?;
                target.splice(
                    index..index + self.previous.size(),
                    self.next.elements().iter().cloned(),
                );
            }
            DeltaType::Delete => {
                self.previous.verify_by(target, eq)?;
                let index = self.previous.position()?;
                target.drain(index..index + self.previous.size());
            }
            DeltaType::Insert => {
                let index = check_position(&self.previous, target.len())?;
                target.splice(index..index, self.next.elements().iter().cloned());
            }
            DeltaType::Same => {}
        }
        Ok(())
    }

    /// Reverts this delta on `target` in place.
    ///
    /// The target must still be indexed like the target sequence at and
    /// before `next.index`.
    pub fn restore_by<F>(&self, target: &mut Vec<E>, eq: F) -> Result<()>
    where
        F: Fn(&E, &E) -> bool,
    {
        match self.delta_type {
            DeltaType::Change => {
                self.next.verify_by(target, eq)?;
                let index = self.next.position()?;
                target.splice(
                    index..index + self.next.size(),
                    self.previous.elements().iter().cloned(),
                );
            }
            DeltaType::Delete => {
                let index = check_position(&self.next, target.len())?;
                target.splice(index..index, self.previous.elements().iter().cloned());
            }
            DeltaType::Insert => {
                self.next.verify_by(target, eq)?;
                let index = self.next.position()?;
                target.drain(index..index + self.next.size());
            }
            DeltaType::Same => {}
        }
        Ok(())
    }
}

impl<E: Clone + PartialEq> Delta<E> {
    /// Applies this delta to `target` in place.
    pub fn apply_to(&self, target: &mut Vec<E>) -> Result<()> {
        self.apply_by(target, |a, b| a == b)
    }

    /// Reverts this delta on `target` in place.
    pub fn restore_to(&self, target: &mut Vec<E>) -> Result<()> {
        self.restore_by(target, |a, b| a == b)
    }

    /// Checks that this delta can be applied to `target`.
    pub fn verify(&self, target: &[E]) -> Result<()> {
        self.verify_by(target, |a, b| a == b)
    }
}

/// Returns the chunk's position if it lies within `0..=len`.
fn check_position<E>(chunk: &Chunk<E>, len: usize) -> Result<usize> {
    let index = chunk.position()?;
    if index > len {
        return Err(Error::ChunkOutOfBounds {
            index,
            size: chunk.size(),
            len,
        });
    }
    Ok(index)
}

fn chunk_eq_by<E, F>(a: &Chunk<E>, b: &Chunk<E>, eq: &F) -> bool
where
    F: Fn(&E, &E) -> bool,
{
    a.index() == b.index()
        && a.size() == b.size()
        && a.elements().iter().zip(b.elements()).all(|(x, y)| eq(x, y))
}
