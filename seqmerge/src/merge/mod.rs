//! Three-way merge.
//!
//! This module reconciles two independently edited versions of a sequence
//! (`current` and `next`) against their common ancestor.
//!
//! # Algorithm Overview
//!
//! Both versions are diffed against the ancestor, then:
//! 1. If `next` did not change anything, the result is `current`
//! 2. An empty `current` is handled up front and logged
//! 3. If `current` replaced the whole ancestor, the fallback policy picks
//!    one complete version
//! 4. Otherwise the ancestor is walked with one read-only cursor per patch.
//!    Insertions at a position come first and are merged additively.
//!    Equal edits apply once. Edits of one side apply as they are. When
//!    both sides edit overlapping spans, the maximal overlapping region is
//!    recorded as conflicts and resolved by the fallback or by a decision.
//! 5. Insertions past the end of the ancestor are handled like any other
//!    insertion
//!
//! Conflicts never abort a merge. Only a patch that does not fit its
//! sequence surfaces as an error.

mod config;
mod conflict;
mod insertions;
mod result;

pub use config::{Fallback, MergeConfig};
pub use conflict::{Conflict, ConflictDecision, DecisionType};
pub use result::MergeResult;

use std::ops::Range;

use tracing::debug;

use crate::diagnostics::DiagnosticLog;
use crate::diff::diff_by;
use crate::error::Result;
use crate::model::{Delta, Patch};

/// Runs three-way merges with a fixed configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeEngine {
    config: MergeConfig,
}

impl MergeEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: MergeConfig) -> Self {
        MergeEngine { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merges `current` and `next` relative to `ancestor`.
    pub fn merge<E>(&self, ancestor: &[E], current: &[E], next: &[E]) -> Result<MergeResult<E>>
    where
        E: Clone + PartialEq,
    {
        self.merge_with_decisions(ancestor, current, next, &[])
    }

    /// Merges with a custom element equality.
    pub fn merge_by<E, F>(
        &self,
        ancestor: &[E],
        current: &[E],
        next: &[E],
        eq: F,
    ) -> Result<MergeResult<E>>
    where
        E: Clone,
        F: Fn(&E, &E) -> bool,
    {
        run(self.config, ancestor, current, next, &eq, &[])
    }

    /// Merges and resolves conflicts with the given decisions.
    ///
    /// A decided decision applies to the conflict recorded at the same
    /// ancestor index. Conflicts without a decision use the fallback.
    pub fn merge_with_decisions<E>(
        &self,
        ancestor: &[E],
        current: &[E],
        next: &[E],
        decisions: &[ConflictDecision<E>],
    ) -> Result<MergeResult<E>>
    where
        E: Clone + PartialEq,
    {
        run(
            self.config,
            ancestor,
            current,
            next,
            &|a: &E, b: &E| a == b,
            decisions,
        )
    }
}

/// Merges `current` and `next` relative to `ancestor`.
pub fn merge<E>(
    ancestor: &[E],
    current: &[E],
    next: &[E],
    config: &MergeConfig,
) -> Result<MergeResult<E>>
where
    E: Clone + PartialEq,
{
    MergeEngine::new(*config).merge(ancestor, current, next)
}

fn run<E, F>(
    config: MergeConfig,
    ancestor: &[E],
    current: &[E],
    next: &[E],
    eq: &F,
    decisions: &[ConflictDecision<E>],
) -> Result<MergeResult<E>>
where
    E: Clone,
    F: Fn(&E, &E) -> bool,
{
    debug!(
        ancestor = ancestor.len(),
        current = current.len(),
        next = next.len(),
        fallback = config.fallback.name(),
        "merging"
    );

    let patch_current = diff_by(ancestor, current, eq);
    let patch_next = diff_by(ancestor, next, eq);

    let mut merger = Merger {
        ancestor,
        eq,
        fallback: config.fallback,
        decisions,
        merged: Vec::new(),
        conflicts: Vec::new(),
        log: DiagnosticLog::new(),
    };

    if patch_next.is_empty() {
        merger.merged = current.to_vec();
    } else if current.is_empty() {
        merger.empty_current(next);
    } else if let Some(replaced) = fully_modified(&patch_current, ancestor.len()) {
        merger.fully_modified(current, next, replaced, &patch_next);
    } else {
        merger.walk(&patch_current, &patch_next)?;
    }

    let Merger {
        merged,
        conflicts,
        log,
        ..
    } = merger;

    debug!(
        merged = merged.len(),
        conflicts = conflicts.len(),
        "merge finished"
    );

    Ok(MergeResult::new(
        ancestor.to_vec(),
        current.to_vec(),
        next.to_vec(),
        merged,
        conflicts,
        log,
        config,
    ))
}

/// Returns the single delta of `patch` if it replaces all `len` elements.
fn fully_modified<E>(patch: &Patch<E>, len: usize) -> Option<&Delta<E>> {
    match patch.deltas() {
        [only] if only.source_index() == Some(0) && only.previous().size() == len => Some(only),
        _ => None,
    }
}

/// Half-open span of the ancestor consumed by a delta.
fn span<E>(delta: &Delta<E>) -> Result<Range<usize>> {
    let start = delta.previous().position()?;
    Ok(start..start + delta.previous().size())
}

fn sequences_eq<E, F>(a: &[E], b: &[E], eq: &F) -> bool
where
    F: Fn(&E, &E) -> bool,
{
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| eq(x, y))
}

/// Returns the decided decision for the conflict at `index`, if any.
fn find_decision<E: Clone>(
    decisions: &[ConflictDecision<E>],
    index: usize,
) -> Option<&ConflictDecision<E>> {
    decisions
        .iter()
        .find(|decision| decision.is_decided() && decision.conflict().index() == index)
}

/// A read-only position in one side's patch.
struct Cursor<'a, E> {
    deltas: &'a [Delta<E>],
    position: usize,
}

impl<'a, E> Cursor<'a, E> {
    fn new(patch: &'a Patch<E>) -> Self {
        Cursor {
            deltas: patch.deltas(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<&'a Delta<E>> {
        self.deltas.get(self.position)
    }

    /// Returns the pending delta if it starts at `index`.
    fn at(&self, index: usize) -> Option<&'a Delta<E>> {
        self.peek().filter(|delta| delta.source_index() == Some(index))
    }

    /// Returns the pending delta if it is an insertion at `index`.
    fn insert_at(&self, index: usize) -> Option<&'a Delta<E>> {
        self.at(index).filter(|delta| delta.is_insert())
    }

    /// Returns the pending delta if it overlaps or abuts a region ending
    /// at `end`.
    ///
    /// An insertion right at `end` is left for the walk; it neither
    /// consumes nor replaces ancestor elements of the region.
    fn touches(&self, end: usize) -> Option<&'a Delta<E>> {
        self.peek().filter(|delta| match delta.source_index() {
            Some(start) if delta.is_insert() => start < end,
            Some(start) => start <= end,
            None => false,
        })
    }

    fn advance(&mut self) {
        self.position += 1;
    }
}

/// State of one merge run.
struct Merger<'a, E, F> {
    ancestor: &'a [E],
    eq: &'a F,
    fallback: Fallback,
    decisions: &'a [ConflictDecision<E>],
    merged: Vec<E>,
    conflicts: Vec<Conflict<E>>,
    log: DiagnosticLog,
}

impl<'a, E, F> Merger<'a, E, F>
where
    E: Clone,
    F: Fn(&E, &E) -> bool,
{
    /// Handles a `current` version with no elements left.
    fn empty_current(&mut self, next: &[E]) {
        if self.ancestor.is_empty() {
            self.merged = next.to_vec();
        } else if next.is_empty() {
            self.log.warning(None, "modification already applied");
        } else {
            self.log.error(None, "current value is empty");
        }
    }

    /// Picks one complete version when `current` replaced the ancestor.
    fn fully_modified(
        &mut self,
        current: &[E],
        next: &[E],
        replaced: &Delta<E>,
        patch_next: &Patch<E>,
    ) {
        let mut choice = DecisionType::from(self.fallback);
        let mut custom = None;

        if !sequences_eq(current, next, self.eq) {
            if let Some(first) = patch_next.deltas().first() {
                self.conflicts
                    .push(Conflict::new(0, replaced.clone(), first.clone()));
                self.log
                    .warning(Some(0), "current replaces the whole ancestor and differs from next");

                if let Some(decision) = find_decision(self.decisions, 0) {
                    choice = decision.decision_type();
                    custom = decision.chunk().map(|chunk| chunk.elements().to_vec());
                }
            }
        }

        self.merged = match choice {
            DecisionType::Next => next.to_vec(),
            DecisionType::Previous => self.ancestor.to_vec(),
            DecisionType::Custom => custom.unwrap_or_default(),
            DecisionType::Current | DecisionType::Undecided => current.to_vec(),
        };
    }

    /// Walks the ancestor, consuming both patches in lock-step.
    fn walk(&mut self, current: &'a Patch<E>, next: &'a Patch<E>) -> Result<()> {
        let mut current = Cursor::new(current);
        let mut next = Cursor::new(next);

        let mut index = 0;
        while index < self.ancestor.len() {
            self.insertions(index, &mut current, &mut next)?;

            index = match (current.at(index), next.at(index)) {
                (None, None) => {
                    self.merged.push(self.ancestor[index].clone());
                    index + 1
                }
                (Some(c), Some(n)) if c.eq_by(n, self.eq) => {
                    current.advance();
                    next.advance();
                    let end = span(c)?.end;
                    self.replay(&[c], index, end)?;
                    end
                }
                _ => self.region(index, &mut current, &mut next)?,
            };
        }

        // Trailing insertions
        self.insertions(self.ancestor.len(), &mut current, &mut next)
    }

    /// Emits the insertions both sides make at `index`.
    fn insertions(
        &mut self,
        index: usize,
        current: &mut Cursor<'a, E>,
        next: &mut Cursor<'a, E>,
    ) -> Result<()> {
        match (current.insert_at(index), next.insert_at(index)) {
            (Some(c), Some(n)) => {
                current.advance();
                next.advance();

                if c.eq_by(n, self.eq) {
                    self.merged.extend_from_slice(c.next().elements());
                } else {
                    let combined =
                        insertions::or_merge(c.next().elements(), n.next().elements(), self.eq)?;
                    self.log.info(
                        Some(index),
                        format!(
                            "combined insertions of {} and {} elements",
                            c.next().size(),
                            n.next().size()
                        ),
                    );
                    self.merged.extend(combined);
                }
            }
            (Some(c), None) => {
                current.advance();
                self.merged.extend_from_slice(c.next().elements());
            }
            (None, Some(n)) => {
                next.advance();
                self.merged.extend_from_slice(n.next().elements());
            }
            (None, None) => {}
        }
        Ok(())
    }

    /// Merges the region of overlapping edits starting at `start`.
    ///
    /// Returns the ancestor index right after the region.
    fn region(
        &mut self,
        start: usize,
        current: &mut Cursor<'a, E>,
        next: &mut Cursor<'a, E>,
    ) -> Result<usize> {
        let mut current_side: Vec<&'a Delta<E>> = Vec::new();
        let mut next_side: Vec<&'a Delta<E>> = Vec::new();
        let mut end = start;

        if let Some(c) = current.at(start) {
            end = end.max(span(c)?.end);
            current_side.push(c);
            current.advance();
        }
        if let Some(n) = next.at(start) {
            end = end.max(span(n)?.end);
            next_side.push(n);
            next.advance();
        }

        // Grow the region until no pending edit overlaps or abuts it
        loop {
            if let Some(c) = current.touches(end) {
                end = end.max(span(c)?.end);
                current_side.push(c);
                current.advance();
            } else if let Some(n) = next.touches(end) {
                end = end.max(span(n)?.end);
                next_side.push(n);
                next.advance();
            } else {
                break;
            }
        }

        if next_side.is_empty() {
            self.replay(&current_side, start, end)?;
            return Ok(end);
        }
        if current_side.is_empty() {
            self.replay(&next_side, start, end)?;
            return Ok(end);
        }

        let mut indices = Vec::new();
        for c in &current_side {
            for n in &next_side {
                if c.previous().overlaps(n.previous()) {
                    let index = span(c)?.start.max(span(n)?.start);
                    self.log.warning(
                        Some(index),
                        format!(
                            "conflicting edits: current {} and next {}",
                            c.delta_type().tag_name(),
                            n.delta_type().tag_name()
                        ),
                    );
                    self.conflicts
                        .push(Conflict::new(index, (*c).clone(), (*n).clone()));
                    indices.push(index);
                }
            }
        }

        let decisions = self.decisions;
        let decision = indices
            .iter()
            .find_map(|&index| find_decision(decisions, index));
        let choice = decision
            .map(|decision| decision.decision_type())
            .unwrap_or_else(|| DecisionType::from(self.fallback));

        match choice {
            DecisionType::Next => self.replay(&next_side, start, end)?,
            DecisionType::Previous => self
                .merged
                .extend_from_slice(&self.ancestor[start..end]),
            DecisionType::Custom => {
                if let Some(chunk) = decision.and_then(|decision| decision.chunk()) {
                    self.merged.extend_from_slice(chunk.elements());
                }
            }
            DecisionType::Current | DecisionType::Undecided => {
                self.replay(&current_side, start, end)?
            }
        }

        self.log.info(
            Some(start),
            format!("region {}..{} resolved as {}", start, end, choice.name()),
        );
        Ok(end)
    }

    /// Emits `ancestor[start..end]` with one side's deltas applied.
    fn replay(&mut self, deltas: &[&Delta<E>], start: usize, end: usize) -> Result<()> {
        let mut position = start;
        for delta in deltas {
            let delta_span = span(delta)?;
            self.merged
                .extend_from_slice(&self.ancestor[position..delta_span.start]);
            self.merged.extend_from_slice(delta.next().elements());
            position = delta_span.end;
        }
        self.merged.extend_from_slice(&self.ancestor[position..end]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn merge_chars(
        ancestor: &str,
        current: &str,
        next: &str,
        fallback: Fallback,
    ) -> MergeResult<char> {
        let engine = MergeEngine::new(MergeConfig::new().with_fallback(fallback));
        engine
            .merge(&chars(ancestor), &chars(current), &chars(next))
            .unwrap()
    }

    fn merged(result: &MergeResult<char>) -> String {
        result.merged().iter().collect()
    }

    #[test]
    fn test_identical_versions() {
        let result = merge_chars("abc", "abc", "abc", Fallback::Current);
        assert_eq!(merged(&result), "abc");
        assert!(!result.has_conflicts());
        assert!(result.log().is_empty());
    }

    #[test]
    fn test_only_next_changed() {
        let result = merge_chars("abc", "abc", "aYc", Fallback::Current);
        assert_eq!(merged(&result), "aYc");
        assert!(!result.has_conflicts());
    }

    #[test]
    fn test_only_current_changed() {
        let result = merge_chars("abc", "aXc", "abc", Fallback::Next);
        assert_eq!(merged(&result), "aXc");
    }

    #[test]
    fn test_same_position_conflict() {
        let result = merge_chars("abc", "aXc", "aYc", Fallback::Current);
        assert_eq!(merged(&result), "aXc");
        assert_eq!(result.conflicts().len(), 1);
        assert_eq!(result.conflicts()[0].index(), 1);
        assert_eq!(result.log().count(Severity::Warning), 1);

        assert_eq!(merged(&merge_chars("abc", "aXc", "aYc", Fallback::Next)), "aYc");
        assert_eq!(merged(&merge_chars("abc", "aXc", "aYc", Fallback::Previous)), "abc");
    }

    #[test]
    fn test_equal_edits_apply_once() {
        let result = merge_chars("abc", "aXc", "aXc", Fallback::Current);
        assert_eq!(merged(&result), "aXc");
        assert!(!result.has_conflicts());
    }

    #[test]
    fn test_disjoint_edits() {
        let result = merge_chars("abcd", "Xbcd", "abcY", Fallback::Current);
        assert_eq!(merged(&result), "XbcY");
        assert!(!result.has_conflicts());
    }

    #[test]
    fn test_adjacent_edits_conflict() {
        let result = merge_chars("abcd", "aXcd", "abYd", Fallback::Current);
        assert_eq!(result.conflicts().len(), 1);
        assert_eq!(result.conflicts()[0].index(), 2);
        assert_eq!(merged(&result), "aXcd");

        assert_eq!(merged(&merge_chars("abcd", "aXcd", "abYd", Fallback::Next)), "abYd");
        assert_eq!(merged(&merge_chars("abcd", "aXcd", "abYd", Fallback::Previous)), "abcd");
    }

    #[test]
    fn test_adjacent_edits_chain_into_one_region() {
        let result = merge_chars("abcde", "aXcZe", "abYde", Fallback::Next);
        assert_eq!(result.conflicts().len(), 2);
        assert_eq!(result.conflicts()[0].index(), 2);
        assert_eq!(result.conflicts()[1].index(), 3);
        assert_eq!(merged(&result), "abYde");
        assert_eq!(result.log().count(Severity::Info), 1);
    }

    #[test]
    fn test_insertion_after_other_sides_edit() {
        let result = merge_chars("abc", "aXc", "abYc", Fallback::Current);
        assert_eq!(merged(&result), "aXYc");
        assert!(!result.has_conflicts());
    }

    #[test]
    fn test_leading_insertions_are_additive() {
        let result = merge_chars("a", "xa", "ya", Fallback::Current);
        assert_eq!(merged(&result), "xya");
        assert!(!result.has_conflicts());
    }

    #[test]
    fn test_trailing_insertions_are_additive() {
        let result = merge_chars("ab", "abx", "aby", Fallback::Current);
        assert_eq!(merged(&result), "abxy");
        assert!(!result.has_conflicts());
    }

    #[test]
    fn test_insertion_before_other_sides_edit() {
        let result = merge_chars("abc", "aXbc", "aYc", Fallback::Current);
        assert_eq!(merged(&result), "aXYc");
        assert!(!result.has_conflicts());
    }

    #[test]
    fn test_misaligned_overlap() {
        let result = merge_chars("abcdef", "aXef", "abcYf", Fallback::Current);
        assert_eq!(result.conflicts().len(), 1);
        assert_eq!(result.conflicts()[0].index(), 3);
        assert_eq!(merged(&result), "aXef");

        assert_eq!(merged(&merge_chars("abcdef", "aXef", "abcYf", Fallback::Next)), "abcYf");
        assert_eq!(
            merged(&merge_chars("abcdef", "aXef", "abcYf", Fallback::Previous)),
            "abcdef"
        );
    }

    #[test]
    fn test_insertion_inside_deleted_region() {
        let result = merge_chars("abcd", "ad", "abXcd", Fallback::Current);
        assert_eq!(result.conflicts().len(), 1);
        assert_eq!(result.conflicts()[0].index(), 2);
        assert_eq!(merged(&result), "ad");

        assert_eq!(merged(&merge_chars("abcd", "ad", "abXcd", Fallback::Next)), "abXcd");
    }

    #[test]
    fn test_fully_modified_current() {
        let result = merge_chars("abc", "z", "abd", Fallback::Current);
        assert_eq!(result.conflicts().len(), 1);
        assert_eq!(result.conflicts()[0].index(), 0);
        assert_eq!(merged(&result), "z");

        assert_eq!(merged(&merge_chars("abc", "z", "abd", Fallback::Next)), "abd");
        assert_eq!(merged(&merge_chars("abc", "z", "abd", Fallback::Previous)), "abc");
    }

    #[test]
    fn test_fully_modified_without_conflict() {
        let result = merge_chars("abc", "z", "z", Fallback::Current);
        assert_eq!(merged(&result), "z");
        assert!(!result.has_conflicts());

        let result = merge_chars("abc", "z", "z", Fallback::Previous);
        assert_eq!(merged(&result), "abc");
        assert!(!result.has_conflicts());
    }

    #[test]
    fn test_empty_ancestor() {
        let result = merge_chars("", "x", "y", Fallback::Current);
        assert_eq!(merged(&result), "x");
        assert_eq!(result.conflicts().len(), 1);

        let result = merge_chars("", "", "y", Fallback::Current);
        assert_eq!(merged(&result), "y");
        assert!(result.log().is_empty());
    }

    #[test]
    fn test_empty_current() {
        let result = merge_chars("abc", "", "", Fallback::Current);
        assert_eq!(merged(&result), "");
        assert_eq!(result.log().entries()[0].severity, Severity::Warning);
        assert_eq!(result.log().entries()[0].text, "modification already applied");

        let result = merge_chars("abc", "", "abd", Fallback::Current);
        assert_eq!(merged(&result), "");
        assert!(result.log().has_errors());
        assert_eq!(result.log().entries()[0].text, "current value is empty");
    }

    #[test]
    fn test_resolve_with_decisions() {
        let result = merge_chars("abc", "aXc", "aYc", Fallback::Current);
        let mut decisions = result.decisions();
        assert_eq!(decisions.len(), 1);

        decisions[0].set_type(DecisionType::Next);
        let resolved = result.resolve(&decisions).unwrap();
        assert_eq!(merged(&resolved), "aYc");
        assert_eq!(resolved.conflicts().len(), 1);

        decisions[0].set_custom(vec!['Q', 'R']);
        assert_eq!(merged(&result.resolve(&decisions).unwrap()), "aQRc");

        decisions[0].set_type(DecisionType::Undecided);
        assert_eq!(merged(&result.resolve(&decisions).unwrap()), "aXc");
    }

    #[test]
    fn test_decision_on_fully_modified() {
        let result = merge_chars("abc", "z", "abd", Fallback::Current);
        let mut decisions = result.decisions();
        decisions[0].set_type(DecisionType::Next);
        assert_eq!(merged(&result.resolve(&decisions).unwrap()), "abd");
    }

    #[test]
    fn test_merge_by_custom_equality() {
        let engine = MergeEngine::default();
        let result = engine
            .merge_by(&["a", "b"], &["A", "b"], &["a", "B"], |x, y| {
                x.eq_ignore_ascii_case(y)
            })
            .unwrap();
        assert_eq!(result.merged(), &["A", "b"]);
        assert!(!result.has_conflicts());
    }

    #[test]
    fn test_free_function() {
        let config = MergeConfig::new().with_fallback(Fallback::Next);
        let result = merge(&[1, 2, 3], &[1, 5, 3], &[1, 6, 3], &config).unwrap();
        assert_eq!(result.merged(), &[1, 6, 3]);
        assert_eq!(result.config().fallback, Fallback::Next);
    }
}
