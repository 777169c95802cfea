//! Merge conflicts and their resolutions.

use super::config::Fallback;
use crate::model::{Chunk, Delta};

/// A point where the current and next versions disagree.
///
/// Conflicts are produced by the merge and are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Conflict<E> {
    index: usize,
    delta_current: Delta<E>,
    delta_next: Delta<E>,
}

impl<E> Conflict<E> {
    /// Creates a conflict at the given ancestor index.
    pub fn new(index: usize, delta_current: Delta<E>, delta_next: Delta<E>) -> Self {
        Conflict {
            index,
            delta_current,
            delta_next,
        }
    }

    /// Returns the ancestor index the conflict was detected at.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the edit made by the current version.
    pub fn delta_current(&self) -> &Delta<E> {
        &self.delta_current
    }

    /// Returns the edit made by the next version.
    pub fn delta_next(&self) -> &Delta<E> {
        &self.delta_next
    }

    /// Converts the element type.
    pub fn map<U, F>(self, mut f: F) -> Conflict<U>
    where
        F: FnMut(E) -> U,
    {
        Conflict {
            index: self.index,
            delta_current: self.delta_current.map(&mut f),
            delta_next: self.delta_next.map(&mut f),
        }
    }
}

/// How a conflict was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecisionType {
    /// Not resolved yet; the merge fallback applies.
    #[default]
    Undecided,
    /// Take the current version's edit.
    Current,
    /// Take the next version's edit.
    Next,
    /// Keep the ancestor's content.
    Previous,
    /// Use caller-supplied elements.
    Custom,
}

impl DecisionType {
    /// Returns the lowercase name of this decision.
    pub fn name(&self) -> &'static str {
        match self {
            DecisionType::Undecided => "undecided",
            DecisionType::Current => "current",
            DecisionType::Next => "next",
            DecisionType::Previous => "previous",
            DecisionType::Custom => "custom",
        }
    }
}

impl From<Fallback> for DecisionType {
    fn from(fallback: Fallback) -> Self {
        match fallback {
            Fallback::Current => DecisionType::Current,
            Fallback::Next => DecisionType::Next,
            Fallback::Previous => DecisionType::Previous,
        }
    }
}

/// A resolution attached to a [`Conflict`] after a merge.
///
/// Changing the decision type recomputes the chosen chunk from the
/// conflict's deltas. Decisions can be passed back to
/// [`MergeEngine::merge_with_decisions`](crate::MergeEngine::merge_with_decisions)
/// to re-run the merge with them applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictDecision<E> {
    decision_type: DecisionType,
    chunk: Option<Chunk<E>>,
    conflict: Conflict<E>,
}

impl<E: Clone> ConflictDecision<E> {
    /// Creates an undecided decision for a conflict.
    pub fn new(conflict: Conflict<E>) -> Self {
        ConflictDecision {
            decision_type: DecisionType::Undecided,
            chunk: None,
            conflict,
        }
    }

    /// Creates a decision of the given type.
    pub fn with_type(conflict: Conflict<E>, decision_type: DecisionType) -> Self {
        let mut decision = Self::new(conflict);
        decision.set_type(decision_type);
        decision
    }

    /// Returns the decision type.
    pub fn decision_type(&self) -> DecisionType {
        self.decision_type
    }

    /// Returns the chosen chunk, if decided.
    pub fn chunk(&self) -> Option<&Chunk<E>> {
        self.chunk.as_ref()
    }

    /// Returns the conflict this decision resolves.
    pub fn conflict(&self) -> &Conflict<E> {
        &self.conflict
    }

    /// Returns true unless the decision is still undecided.
    pub fn is_decided(&self) -> bool {
        self.decision_type != DecisionType::Undecided
    }

    /// Changes the decision type and recomputes the chunk.
    ///
    /// Switching to [`DecisionType::Custom`] keeps previously supplied
    /// custom elements, or starts from an empty chunk.
    pub fn set_type(&mut self, decision_type: DecisionType) {
        let chunk = match decision_type {
            DecisionType::Undecided => None,
            DecisionType::Current => Some(self.conflict.delta_current().next().clone()),
            DecisionType::Next => Some(self.conflict.delta_next().next().clone()),
            DecisionType::Previous => Some(self.conflict.delta_current().previous().clone()),
            DecisionType::Custom => match (self.decision_type, self.chunk.take()) {
                (DecisionType::Custom, Some(chunk)) => Some(chunk),
                _ => Some(Chunk::empty(self.conflict.index())),
            },
        };

        self.decision_type = decision_type;
        self.chunk = chunk;
    }

    /// Resolves the conflict with caller-supplied elements.
    pub fn set_custom(&mut self, elements: Vec<E>) {
        self.decision_type = DecisionType::Custom;
        self.chunk = Some(Chunk::new(self.conflict.index(), elements));
    }
}
