//! Property tests for the truthness invariants.
//!
//! Every heuristic must produce a valid truthness (exactly one side at 1.0,
//! both in [0, 1]) and the operator reductions must agree with each other.

use proptest::prelude::*;
use truthness_core::distance::{
    distance_to_int_range, heuristic_from_scaled_distance_with_base, increased_distance,
    left_alignment_distance, MAX_CHAR_DISTANCE,
};
use truthness_core::jumps::{for_float_comparison, for_value_comparison};
use truthness_core::replacement::{
    contains_truthness, ends_with_truthness, starts_with_truthness, string_equality_truthness,
};
use truthness_core::{Comparison, ComparisonOp, StringComparison, Truthness};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_op() -> impl Strategy<Value = ComparisonOp> {
    prop::sample::select(ComparisonOp::ALL.to_vec())
}

fn arb_mode() -> impl Strategy<Value = StringComparison> {
    prop_oneof![
        Just(StringComparison::CaseSensitive),
        Just(StringComparison::CaseInsensitive),
    ]
}

fn assert_valid(t: Truthness) -> Result<(), TestCaseError> {
    prop_assert!((0.0..=1.0).contains(&t.of_true()), "of_true={}", t.of_true());
    prop_assert!((0.0..=1.0).contains(&t.of_false()), "of_false={}", t.of_false());
    prop_assert!(t.is_true() != t.is_false(), "t={:?}", t);
    Ok(())
}

fn lt_i(a: i64, b: i64) -> Truthness {
    for_value_comparison(a, b, Comparison::ordered(ComparisonOp::Lt))
}

fn lt_f(a: f64, b: f64) -> Truthness {
    for_float_comparison(a, b, Comparison::ordered(ComparisonOp::Lt))
}

// ---------------------------------------------------------------------------
// Jumps
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn integer_jumps_are_valid(a in any::<i64>(), b in any::<i64>(), op in arb_op(), unsigned in any::<bool>()) {
        let comparison = Comparison { op, unordered: unsigned };
        assert_valid(for_value_comparison(a, b, comparison))?;
    }

    #[test]
    fn float_jumps_are_valid(a in any::<f64>(), b in any::<f64>(), op in arb_op(), unordered in any::<bool>()) {
        let comparison = Comparison { op, unordered };
        assert_valid(for_float_comparison(a, b, comparison))?;
    }

    #[test]
    fn integer_reductions_agree(a in any::<i64>(), b in any::<i64>()) {
        let at = |op| for_value_comparison(a, b, Comparison::ordered(op));
        prop_assert_eq!(at(ComparisonOp::Ne), at(ComparisonOp::Eq).invert());
        prop_assert_eq!(at(ComparisonOp::Ge), lt_i(a, b).invert());
        prop_assert_eq!(at(ComparisonOp::Le), lt_i(b, a).invert());
        prop_assert_eq!(at(ComparisonOp::Gt), lt_i(b, a));
    }

    #[test]
    fn float_reductions_agree(a in -1e12f64..1e12, b in -1e12f64..1e12) {
        let at = |op| for_float_comparison(a, b, Comparison::ordered(op));
        prop_assert_eq!(at(ComparisonOp::Ne), at(ComparisonOp::Eq).invert());
        prop_assert_eq!(at(ComparisonOp::Ge), lt_f(a, b).invert());
        prop_assert_eq!(at(ComparisonOp::Le), lt_f(b, a).invert());
        prop_assert_eq!(at(ComparisonOp::Gt), lt_f(b, a));
    }

    #[test]
    fn closer_operands_score_higher(a in -1000i64..1000, gap in 1i64..1000) {
        // a < a + gap is true; a wider gap is further from flipping
        let near = lt_i(a, a + gap);
        let far = lt_i(a, a + gap + 1);
        prop_assert!(near.of_false() > far.of_false());
    }
}

// ---------------------------------------------------------------------------
// Distances
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn increased_distance_never_decreases(d in 0.0f64..f64::MAX, delta in 1e-9f64..1e300) {
        let out = increased_distance(d, delta).unwrap();
        prop_assert!(out >= d);
        prop_assert!(out.is_finite());
    }

    #[test]
    fn heuristic_is_bounded(base in 0.0f64..1.0, d in 0.0f64..f64::MAX) {
        let h = heuristic_from_scaled_distance_with_base(base, d).unwrap();
        prop_assert!(h >= base && h <= 1.0, "base={} d={} h={}", base, d, h);
    }

    #[test]
    fn range_distance_is_zero_inside(min in -1000i64..1000, width in 0i64..1000, pick in 0i64..1000) {
        let max = min + width;
        let c = min + pick % (width + 1);
        prop_assert_eq!(distance_to_int_range(c, min, max).unwrap(), 0);
        prop_assert!(distance_to_int_range(max + 1, min, max).unwrap() == 1);
    }

    #[test]
    fn length_gap_dominates(a in "[a-z]{0,12}", b in "[a-z]{0,12}") {
        let gap = (a.len() as i64 - b.len() as i64).unsigned_abs();
        let d = left_alignment_distance(&a, &b, StringComparison::CaseSensitive);
        prop_assert!(d >= gap * MAX_CHAR_DISTANCE);
        prop_assert!(d < (gap + 1) * MAX_CHAR_DISTANCE);
        prop_assert_eq!(d == 0, a == b);
    }
}

// ---------------------------------------------------------------------------
// String replacements
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn string_heuristics_are_valid(
        caller in "[a-cA-C]{0,8}",
        arg in "[a-cA-C]{0,4}",
        offset in -10i64..10,
        mode in arb_mode(),
    ) {
        assert_valid(string_equality_truthness(&caller, Some(&arg), mode).unwrap())?;
        assert_valid(starts_with_truthness(&caller, &arg, offset, mode).unwrap())?;
        assert_valid(ends_with_truthness(&caller, &arg, mode).unwrap())?;
        assert_valid(contains_truthness(&caller, &arg, mode).unwrap())?;
    }

    #[test]
    fn string_heuristics_match_native_results(caller in "[a-c]{0,8}", arg in "[a-c]{0,4}") {
        let mode = StringComparison::CaseSensitive;
        prop_assert_eq!(string_equality_truthness(&caller, Some(&arg), mode).unwrap().is_true(), caller == arg);
        prop_assert_eq!(starts_with_truthness(&caller, &arg, 0, mode).unwrap().is_true(), caller.starts_with(&arg));
        prop_assert_eq!(ends_with_truthness(&caller, &arg, mode).unwrap().is_true(), caller.ends_with(&arg));
        prop_assert_eq!(contains_truthness(&caller, &arg, mode).unwrap().is_true(), caller.contains(&arg));
    }
}
