//! Merge output envelope.

use super::config::MergeConfig;
use super::conflict::{Conflict, ConflictDecision};
use super::MergeEngine;
use crate::diagnostics::DiagnosticLog;
use crate::error::Result;

/// The outcome of a three-way merge.
///
/// A merge always produces a usable merged sequence. Callers should still
/// check [`MergeResult::has_conflicts`] and the log: a successful return
/// does not mean the merge was clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult<E> {
    ancestor: Vec<E>,
    current: Vec<E>,
    next: Vec<E>,
    merged: Vec<E>,
    conflicts: Vec<Conflict<E>>,
    log: DiagnosticLog,
    config: MergeConfig,
}

impl<E> MergeResult<E> {
    pub(crate) fn new(
        ancestor: Vec<E>,
        current: Vec<E>,
        next: Vec<E>,
        merged: Vec<E>,
        conflicts: Vec<Conflict<E>>,
        log: DiagnosticLog,
        config: MergeConfig,
    ) -> Self {
        MergeResult {
            ancestor,
            current,
            next,
            merged,
            conflicts,
            log,
            config,
        }
    }

    /// Returns the common ancestor.
    pub fn ancestor(&self) -> &[E] {
        &self.ancestor
    }

    /// Returns the current version.
    pub fn current(&self) -> &[E] {
        &self.current
    }

    /// Returns the next version.
    pub fn next(&self) -> &[E] {
        &self.next
    }

    /// Returns the merged sequence.
    pub fn merged(&self) -> &[E] {
        &self.merged
    }

    /// Consumes the result and returns the merged sequence.
    pub fn into_merged(self) -> Vec<E> {
        self.merged
    }

    /// Returns the conflicts in ancestor order.
    pub fn conflicts(&self) -> &[Conflict<E>] {
        &self.conflicts
    }

    /// Returns true if any conflict was recorded.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Returns the diagnostic log.
    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    /// Returns the configuration the merge ran with.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Converts the element type of every sequence and conflict.
    pub fn map<U, F>(self, mut f: F) -> MergeResult<U>
    where
        F: FnMut(E) -> U,
    {
        let mut convert = |items: Vec<E>| items.into_iter().map(&mut f).collect::<Vec<U>>();
        let ancestor = convert(self.ancestor);
        let current = convert(self.current);
        let next = convert(self.next);
        let merged = convert(self.merged);

        MergeResult {
            ancestor,
            current,
            next,
            merged,
            conflicts: self
                .conflicts
                .into_iter()
                .map(|conflict| conflict.map(&mut f))
                .collect(),
            log: self.log,
            config: self.config,
        }
    }
}

impl<E: Clone> MergeResult<E> {
    /// Returns one undecided decision per conflict.
    pub fn decisions(&self) -> Vec<ConflictDecision<E>> {
        self.conflicts
            .iter()
            .cloned()
            .map(ConflictDecision::new)
            .collect()
    }
}

impl<E: Clone + PartialEq> MergeResult<E> {
    /// Re-runs the merge on the same inputs with the given decisions.
    ///
    /// Undecided decisions leave their conflicts to the fallback.
    pub fn resolve(&self, decisions: &[ConflictDecision<E>]) -> Result<MergeResult<E>> {
        MergeEngine::new(self.config).merge_with_decisions(
            &self.ancestor,
            &self.current,
            &self.next,
            decisions,
        )
    }
}
