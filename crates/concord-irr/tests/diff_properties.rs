//! Property tests for the diff partition and code-list parsing invariants.

use proptest::collection::vec;
use proptest::prelude::*;

use concord_irr::diff_codes;
use concord_model::{parse_codes, Codebook};

/// Tokens drawn from a small alphabet so overlap between lists is common.
fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("c".to_string()),
        Just("d".to_string()),
        Just("f1".to_string()),
        Just("f2".to_string()),
    ]
}

fn code_list() -> impl Strategy<Value = Vec<String>> {
    vec(token(), 0..6).prop_map(|tokens| {
        let mut out: Vec<String> = Vec::new();
        for t in tokens {
            if !out.contains(&t) {
                out.push(t);
            }
        }
        out
    })
}

fn codebook() -> Codebook {
    Codebook::new(
        vec!["a".into(), "b".into(), "c".into(), "d".into()],
        vec!["f1".into(), "f2".into()],
    )
}

proptest! {
    #[test]
    fn every_code_lands_in_exactly_one_bucket(a in code_list(), b in code_list()) {
        let diff = diff_codes(&a, &b, &codebook()).unwrap();

        for code in a.iter().chain(&b) {
            let buckets = [
                diff.both.contains(code),
                diff.only_a.contains(code),
                diff.only_b.contains(code),
            ];
            prop_assert_eq!(buckets.iter().filter(|&&hit| hit).count(), 1);
        }

        // The one-sided buckets are disjoint from the agreement bucket.
        for code in diff.only_a.iter().chain(&diff.only_b) {
            prop_assert!(!diff.both.contains(code));
        }
    }

    #[test]
    fn flags_never_cause_conflict(a in code_list(), b in code_list()) {
        let diff = diff_codes(&a, &b, &codebook()).unwrap();
        for flag in ["f1", "f2"] {
            prop_assert!(!diff.only_a.iter().any(|c| c == flag));
            prop_assert!(!diff.only_b.iter().any(|c| c == flag));
        }
    }

    #[test]
    fn diff_is_symmetric_under_swap(a in code_list(), b in code_list()) {
        let forward = diff_codes(&a, &b, &codebook()).unwrap();
        let backward = diff_codes(&b, &a, &codebook()).unwrap();

        let sorted = |mut v: Vec<String>| { v.sort(); v };
        prop_assert_eq!(sorted(forward.only_a), sorted(backward.only_b));
        prop_assert_eq!(sorted(forward.only_b), sorted(backward.only_a));
        prop_assert_eq!(sorted(forward.both), sorted(backward.both));
    }

    #[test]
    fn reparsing_normalized_text_is_a_fixed_point(raw in "[a-c, ]{0,24}") {
        let once = parse_codes(&raw);
        let twice = parse_codes(&once.join(","));
        prop_assert_eq!(once, twice);
    }
}
