//! Diff output envelope.

use crate::diagnostics::DiagnosticLog;
use crate::model::Patch;

/// The outcome of diffing two sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult<E> {
    previous: Vec<E>,
    next: Vec<E>,
    patch: Patch<E>,
    log: DiagnosticLog,
}

impl<E> DiffResult<E> {
    pub(crate) fn new(previous: Vec<E>, next: Vec<E>, patch: Patch<E>, log: DiagnosticLog) -> Self {
        DiffResult {
            previous,
            next,
            patch,
            log,
        }
    }

    /// Returns the sequence the patch starts from.
    pub fn previous(&self) -> &[E] {
        &self.previous
    }

    /// Returns the sequence the patch leads to.
    pub fn next(&self) -> &[E] {
        &self.next
    }

    /// Returns the computed patch.
    pub fn patch(&self) -> &Patch<E> {
        &self.patch
    }

    /// Consumes the result and returns the patch.
    pub fn into_patch(self) -> Patch<E> {
        self.patch
    }

    /// Returns the diagnostic log.
    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    /// Returns true if both sequences are equal.
    pub fn is_identical(&self) -> bool {
        self.patch.is_empty()
    }
}
