//! Randomized properties of diff, patch and merge.

use proptest::prelude::*;

use seqmerge::xml::{parse_str, print_to_string};
use seqmerge::{diff, merge, DecisionType, Delta, Fallback, MergeConfig, Patch, PatchDocument};

/// Short sequences over a small alphabet, so that matches are frequent.
fn arb_seq() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..4, 0..12)
}

fn arb_fallback() -> impl Strategy<Value = Fallback> {
    prop_oneof![
        Just(Fallback::Current),
        Just(Fallback::Next),
        Just(Fallback::Previous),
    ]
}

/// True when the two deltas neither overlap nor touch in the source.
fn separated(a: &Delta<u8>, b: &Delta<u8>) -> bool {
    match (a.source_index(), a.source_end(), b.source_index(), b.source_end()) {
        (Some(a_start), Some(a_end), Some(b_start), Some(b_end)) => {
            a_end < b_start || b_end < a_start
        }
        _ => false,
    }
}

fn arb_lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(r"[ab <&'\t]{0,3}\n?", 0..8)
}

proptest! {
    #[test]
    fn prop_diff_round_trip(a in arb_seq(), b in arb_seq()) {
        let patch = diff(&a, &b);
        prop_assert_eq!(patch.apply(&a).unwrap(), b.clone());
        prop_assert_eq!(patch.restore(&b).unwrap(), a);
    }

    #[test]
    fn prop_diff_of_identical_is_empty(a in arb_seq()) {
        prop_assert!(diff(&a, &a).is_empty());
    }

    #[test]
    fn prop_deltas_are_ordered_and_separated(a in arb_seq(), b in arb_seq()) {
        let patch = diff(&a, &b);
        for pair in patch.deltas().windows(2) {
            prop_assert!(pair[0].source_end() < pair[1].source_index());
        }
    }

    #[test]
    fn prop_merge_identical(a in arb_seq(), fallback in arb_fallback()) {
        let config = MergeConfig::new().with_fallback(fallback);
        let result = merge(&a, &a, &a, &config).unwrap();
        prop_assert_eq!(result.merged(), &a[..]);
        prop_assert!(!result.has_conflicts());
    }

    #[test]
    fn prop_one_sided_change_wins(a in arb_seq(), b in arb_seq(), fallback in arb_fallback()) {
        let config = MergeConfig::new().with_fallback(fallback);

        let result = merge(&a, &b, &a, &config).unwrap();
        prop_assert_eq!(result.merged(), &b[..]);
        prop_assert!(!result.has_conflicts());

        let result = merge(&a, &a, &b, &config).unwrap();
        prop_assert_eq!(result.merged(), &b[..]);
        prop_assert!(!result.has_conflicts());
    }

    #[test]
    fn prop_same_change_on_both_sides(a in arb_seq(), b in arb_seq()) {
        let result = merge(&a, &b, &b, &MergeConfig::default()).unwrap();
        prop_assert_eq!(result.merged(), &b[..]);
        prop_assert!(!result.has_conflicts());
    }

    #[test]
    fn prop_merge_never_fails(
        a in arb_seq(),
        c in arb_seq(),
        n in arb_seq(),
        fallback in arb_fallback(),
    ) {
        let config = MergeConfig::new().with_fallback(fallback);
        let result = merge(&a, &c, &n, &config).unwrap();

        for pair in result.conflicts().windows(2) {
            prop_assert!(pair[0].index() <= pair[1].index());
        }
    }

    #[test]
    fn prop_separated_edits_combine(
        a in arb_seq(),
        c in arb_seq(),
        n in arb_seq(),
        fallback in arb_fallback(),
    ) {
        let patch_current = diff(&a, &c);
        let patch_next = diff(&a, &n);
        let independent = patch_current
            .iter()
            .all(|x| patch_next.iter().all(|y| separated(x, y)));

        if independent {
            let mut deltas: Vec<Delta<u8>> = patch_current.iter().cloned().collect();
            deltas.extend(patch_next.iter().cloned());
            deltas.sort_by_key(|delta| delta.source_index());
            let combined = Patch::from_deltas(deltas).apply(&a).unwrap();

            let config = MergeConfig::new().with_fallback(fallback);
            let result = merge(&a, &c, &n, &config).unwrap();
            prop_assert_eq!(result.merged(), &combined[..]);
            prop_assert!(!result.has_conflicts());
        }
    }

    #[test]
    fn prop_deciding_fallback_changes_nothing(a in arb_seq(), c in arb_seq(), n in arb_seq()) {
        let result = merge(&a, &c, &n, &MergeConfig::default()).unwrap();

        let mut decisions = result.decisions();
        for decision in &mut decisions {
            decision.set_type(DecisionType::Current);
        }
        let resolved = result.resolve(&decisions).unwrap();
        prop_assert_eq!(resolved.merged(), result.merged());
        prop_assert_eq!(resolved.conflicts(), result.conflicts());
    }

    #[test]
    fn prop_patch_document_round_trip(base in arb_lines(), branch in arb_lines()) {
        let document = PatchDocument::new(diff(&base, &branch), &base);
        let parsed = parse_str(&print_to_string(&document).unwrap()).unwrap();
        prop_assert_eq!(&parsed, &document);
        prop_assert_eq!(parsed.apply(&base).unwrap(), branch);
    }
}
