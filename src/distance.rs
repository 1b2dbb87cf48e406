/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Branch distances and the heuristics derived from them.
//!
//! Two scales are used throughout the engine:
//!
//! - **distance**: a value in `[0, MAX]`. Zero means the constraint is solved.
//! - **heuristic**: a value in `[0, 1]`. One means the constraint is solved.
//!
//! Distances are what the literature usually talks about; the search needs
//! bounded heuristics so that objectives of very different magnitude can be
//! ranked side by side.
//!
//! # Invariants
//!
//! - **BD-001**: every distance is `>= 0`; overflow saturates to the type maximum, never wraps.
//! - **BD-002**: `heuristic_from_scaled_distance_with_base` is strictly decreasing in distance
//!   and equals `base` only for an infinite / maximal distance.
//! - **BD-003**: in `left_alignment_distance` a length mismatch always outweighs any
//!   same-length content mismatch of a single code unit.

use alloc::vec::Vec;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::error::{InvalidArgument, Result};
use crate::value::Value;

// ─── Constants ──────────────────────────────────────────────────────────────

/// Heuristic for a target that was reached, but with a null counterpart.
pub const H_REACHED_BUT_NULL: f64 = 0.05;

/// Heuristic base once a non-null counterpart is available.
pub const H_NOT_NULL: f64 = 0.1;

/// Heuristic for a target that was reached, but with an empty counterpart.
pub const H_REACHED_BUT_EMPTY: f64 = H_REACHED_BUT_NULL;

/// Heuristic base once a non-empty counterpart is available.
pub const H_NOT_EMPTY: f64 = H_NOT_NULL;

/// Upper bound on the distance between two UTF-16 code units (2^16).
pub const MAX_CHAR_DISTANCE: u64 = 65_536;

/// The saturated distance: "cannot get any further".
pub const MAX_DISTANCE: f64 = f64::MAX;

// ─── Saturating primitives ──────────────────────────────────────────────────

/// `a + b` for non-negative operands, clamped to [`MAX_DISTANCE`].
pub(crate) fn saturating_add(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum.is_finite() {
        sum
    } else {
        MAX_DISTANCE
    }
}

/// `|a - b|` for finite operands, clamped to [`MAX_DISTANCE`].
pub(crate) fn saturating_abs_diff(a: f64, b: f64) -> f64 {
    let diff = if a < b { b - a } else { a - b };
    if diff < 0.0 || !diff.is_finite() {
        MAX_DISTANCE
    } else {
        diff
    }
}

fn check_distance(distance: f64) -> Result<()> {
    if distance >= 0.0 {
        Ok(())
    } else {
        Err(InvalidArgument::NegativeDistance(distance))
    }
}

fn is_saturated(distance: f64) -> bool {
    distance.is_infinite() || distance == MAX_DISTANCE
}

// ─── Distance arithmetic ────────────────────────────────────────────────────

/// Increase `distance` by `delta`, never returning less than `distance`.
///
/// An infinite or already-saturated distance is returned unchanged.
pub fn increased_distance(distance: f64, delta: f64) -> Result<f64> {
    check_distance(distance)?;
    if delta.is_nan() || delta <= 0.0 {
        return Err(InvalidArgument::Delta(delta));
    }
    if is_saturated(distance) {
        return Ok(distance);
    }
    if distance > MAX_DISTANCE - delta {
        return Ok(MAX_DISTANCE);
    }
    Ok(distance + delta)
}

/// Sum of two distances, saturating on overflow.
pub fn add_distances(a: f64, b: f64) -> Result<f64> {
    check_distance(a)?;
    check_distance(b)?;
    Ok(saturating_add(a, b))
}

// ─── Heuristics ─────────────────────────────────────────────────────────────

/// Map a distance onto `(base, 1]`.
///
/// ```text
/// h = base + (1 - base) / (distance + 1)
///   distance = 0   → 1
///   distance → ∞   → base
/// ```
pub fn heuristic_from_scaled_distance_with_base(base: f64, distance: f64) -> Result<f64> {
    if !(0.0..1.0).contains(&base) {
        return Err(InvalidArgument::Base(base));
    }
    check_distance(distance)?;
    if is_saturated(distance) {
        return Ok(base);
    }
    Ok(base + (1.0 - base) / (distance + 1.0))
}

/// Rescale a heuristic in `[0,1)` so that it starts at `base`.
pub fn scale_heuristic_with_base(heuristic: f64, base: f64) -> Result<f64> {
    if !(0.0..1.0).contains(&heuristic) {
        return Err(InvalidArgument::Heuristic(heuristic));
    }
    if !(0.0..1.0).contains(&base) {
        return Err(InvalidArgument::Base(base));
    }
    Ok(base + (1.0 - base) * heuristic)
}

/// Unbounded proximity `1 / (1 + distance)`, used where no base applies.
pub(crate) fn inverse_distance(distance: f64) -> f64 {
    1.0 / (1.0 + distance)
}

// ─── Characters and ranges ──────────────────────────────────────────────────

/// Distance of `c` to the digits `'0'..='9'`.
pub fn distance_to_digit(c: char) -> u32 {
    range_distance(i64::from(u32::from(c)), i64::from(u32::from('0')), i64::from(u32::from('9'))) as u32
}

/// Distance of `c` to the inclusive range `[min, max]`; zero inside it.
pub fn distance_to_range(c: char, min: char, max: char) -> Result<u32> {
    // code points stay below 2^21, so the distance always fits in u32
    distance_to_int_range(i64::from(u32::from(c)), i64::from(u32::from(min)), i64::from(u32::from(max)))
        .map(|d| d as u32)
}

/// Integer flavour of [`distance_to_range`].
pub fn distance_to_int_range(c: i64, min: i64, max: i64) -> Result<u64> {
    if min > max {
        return Err(InvalidArgument::Range { min, max });
    }
    Ok(range_distance(c, min, max))
}

fn range_distance(c: i64, min: i64, max: i64) -> u64 {
    // at most one of the two terms is non-zero; i128 keeps both exact
    let below = (i128::from(min) - i128::from(c)).max(0);
    let above = (i128::from(c) - i128::from(max)).max(0);
    u64::try_from(below + above).unwrap_or(u64::MAX)
}

/// Absolute code-point difference.
pub fn distance_to_char(c: char, target: char) -> u32 {
    u32::from(c).abs_diff(u32::from(target))
}

// ─── Strings ────────────────────────────────────────────────────────────────

/// How strings are compared by the string heuristics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringComparison {
    /// Exact, code unit by code unit.
    #[default]
    CaseSensitive,
    /// Both sides are lower-cased first (Unicode lower-casing, not locale-aware).
    CaseInsensitive,
}

impl StringComparison {
    /// Fold `s` and encode it as UTF-16 code units.
    pub(crate) fn units(self, s: &str) -> Vec<u16> {
        match self {
            StringComparison::CaseSensitive => s.encode_utf16().collect(),
            StringComparison::CaseInsensitive => s.to_lowercase().encode_utf16().collect(),
        }
    }
}

/// Positional distance between two strings.
///
/// ```text
/// |len(a) - len(b)| × MAX_CHAR_DISTANCE + Σ |a[i] - b[i]|   (i < min(len(a), len(b)))
/// ```
///
/// Lengths and characters are UTF-16 code units, so no per-unit delta can
/// reach [`MAX_CHAR_DISTANCE`]. Saturates at `u64::MAX`.
pub fn left_alignment_distance(a: &str, b: &str, comparison: StringComparison) -> u64 {
    left_alignment_units(&comparison.units(a), &comparison.units(b))
}

pub(crate) fn left_alignment_units(a: &[u16], b: &[u16]) -> u64 {
    let length_gap = a.len().abs_diff(b.len()) as u64;
    a.iter()
        .zip(b.iter())
        .fold(length_gap.saturating_mul(MAX_CHAR_DISTANCE), |dist, (x, y)| {
            dist.saturating_add(u64::from(x.abs_diff(*y)))
        })
}

// ─── Equality distance ──────────────────────────────────────────────────────

/// Types with a numeric distance to equality.
///
/// Integral and character types widen to `f64` (integers beyond 2^53 lose
/// precision; this is accepted). Date and time types convert to seconds.
pub trait EqualityDistance {
    /// Non-negative distance to `self == other`.
    fn distance_to_equality(&self, other: &Self) -> f64;
}

/// Free-function form of [`EqualityDistance::distance_to_equality`].
pub fn distance_to_equality<T: EqualityDistance + ?Sized>(a: &T, b: &T) -> f64 {
    a.distance_to_equality(b)
}

impl EqualityDistance for f64 {
    fn distance_to_equality(&self, other: &f64) -> f64 {
        let (a, b) = (*self, *other);
        if a.is_nan() || b.is_nan() {
            return MAX_DISTANCE;
        }
        if a.is_infinite() || b.is_infinite() {
            // equally infinite is solved; a finite value cannot approach infinity
            return if a == b { 0.0 } else { MAX_DISTANCE };
        }
        saturating_abs_diff(a, b)
    }
}

impl EqualityDistance for f32 {
    fn distance_to_equality(&self, other: &f32) -> f64 {
        f64::from(*self).distance_to_equality(&f64::from(*other))
    }
}

macro_rules! widening_equality_distance {
    ($($t:ty),* $(,)?) => {
        $(
            impl EqualityDistance for $t {
                fn distance_to_equality(&self, other: &$t) -> f64 {
                    (*self as f64).distance_to_equality(&(*other as f64))
                }
            }
        )*
    };
}

widening_equality_distance!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl EqualityDistance for char {
    fn distance_to_equality(&self, other: &char) -> f64 {
        f64::from(u32::from(*self)).distance_to_equality(&f64::from(u32::from(*other)))
    }
}

/// Days between 0001-01-01 and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;
const SECONDS_PER_DAY: i64 = 86_400;

impl EqualityDistance for NaiveDate {
    fn distance_to_equality(&self, other: &NaiveDate) -> f64 {
        let secs = |d: &NaiveDate| (i64::from(d.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE) * SECONDS_PER_DAY;
        secs(self).distance_to_equality(&secs(other))
    }
}

impl EqualityDistance for NaiveTime {
    fn distance_to_equality(&self, other: &NaiveTime) -> f64 {
        self.num_seconds_from_midnight()
            .distance_to_equality(&other.num_seconds_from_midnight())
    }
}

impl EqualityDistance for NaiveDateTime {
    fn distance_to_equality(&self, other: &NaiveDateTime) -> f64 {
        self.and_utc().timestamp().distance_to_equality(&other.and_utc().timestamp())
    }
}

impl EqualityDistance for DateTime<Utc> {
    fn distance_to_equality(&self, other: &DateTime<Utc>) -> f64 {
        self.timestamp().distance_to_equality(&other.timestamp())
    }
}

// ─── Dynamic dispatch ───────────────────────────────────────────────────────

/// Distance between two dynamically-typed operands.
///
/// Operands of the same supported kind use the matching typed rule; strings
/// use [`left_alignment_distance`]. Any other pairing has no usable signal and
/// yields [`MAX_DISTANCE`]. A missing operand is a usage error, so that a real
/// null dereference in the instrumented code is not masked.
pub fn distance(left: Option<&Value>, right: Option<&Value>) -> Result<f64> {
    let left = left.ok_or(InvalidArgument::Missing("left operand"))?;
    let right = right.ok_or(InvalidArgument::Missing("right operand"))?;

    let d = match (left, right) {
        (Value::Str(a), Value::Str(b)) => {
            left_alignment_distance(a, b, StringComparison::CaseSensitive) as f64
        }
        (Value::Byte(a), Value::Byte(b)) => distance_to_equality(a, b),
        (Value::Short(a), Value::Short(b)) => distance_to_equality(a, b),
        (Value::Int(a), Value::Int(b)) => distance_to_equality(a, b),
        (Value::Long(a), Value::Long(b)) => distance_to_equality(a, b),
        (Value::Float(a), Value::Float(b)) => distance_to_equality(a, b),
        (Value::Double(a), Value::Double(b)) => distance_to_equality(a, b),
        (Value::Char(a), Value::Char(b)) => distance_to_equality(a, b),
        (Value::Date(a), Value::Date(b)) => distance_to_equality(a, b),
        (Value::Time(a), Value::Time(b)) => distance_to_equality(a, b),
        (Value::DateTime(a), Value::DateTime(b)) => distance_to_equality(a, b),
        (Value::Instant(a), Value::Instant(b)) => distance_to_equality(a, b),
        _ => {
            tracing::debug!(
                left = left.kind(),
                right = right.kind(),
                "no distance between operand kinds, treating as maximally far"
            );
            MAX_DISTANCE
        }
    };
    Ok(d)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── increased_distance ───────────────────────────────────────────────

    #[test]
    fn test_increased_distance_adds_delta() {
        assert_eq!(increased_distance(3.0, 2.0).unwrap(), 5.0);
        assert_eq!(increased_distance(0.0, 0.5).unwrap(), 0.5);
    }

    #[test]
    fn test_increased_distance_rejects_bad_arguments() {
        assert_eq!(increased_distance(1.0, 0.0), Err(InvalidArgument::Delta(0.0)));
        assert_eq!(increased_distance(1.0, -1.0), Err(InvalidArgument::Delta(-1.0)));
        assert_eq!(
            increased_distance(-1.0, 1.0),
            Err(InvalidArgument::NegativeDistance(-1.0))
        );
        assert!(increased_distance(1.0, f64::NAN).is_err());
        assert!(increased_distance(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_increased_distance_saturates() {
        assert_eq!(increased_distance(MAX_DISTANCE, 1.0).unwrap(), MAX_DISTANCE);
        assert_eq!(increased_distance(MAX_DISTANCE / 2.0 * 1.5, MAX_DISTANCE / 2.0).unwrap(), MAX_DISTANCE);
        assert_eq!(increased_distance(f64::INFINITY, 1.0).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_add_distances() {
        assert_eq!(add_distances(1.0, 2.0).unwrap(), 3.0);
        assert_eq!(add_distances(MAX_DISTANCE, MAX_DISTANCE).unwrap(), MAX_DISTANCE);
        assert!(add_distances(-1.0, 2.0).is_err());
        assert!(add_distances(1.0, -2.0).is_err());
    }

    // ── heuristics ───────────────────────────────────────────────────────

    #[test]
    fn test_heuristic_from_distance() {
        assert_eq!(heuristic_from_scaled_distance_with_base(0.0, 0.0).unwrap(), 1.0);
        assert_eq!(heuristic_from_scaled_distance_with_base(0.0, 1.0).unwrap(), 0.5);
        let h = heuristic_from_scaled_distance_with_base(0.1, 1.0).unwrap();
        assert!((h - 0.55).abs() < 1e-12, "h={}", h);
    }

    #[test]
    fn test_heuristic_at_saturated_distance_is_base() {
        assert_eq!(heuristic_from_scaled_distance_with_base(0.1, MAX_DISTANCE).unwrap(), 0.1);
        assert_eq!(heuristic_from_scaled_distance_with_base(0.3, f64::INFINITY).unwrap(), 0.3);
    }

    #[test]
    fn test_heuristic_rejects_bad_arguments() {
        assert_eq!(heuristic_from_scaled_distance_with_base(1.0, 1.0), Err(InvalidArgument::Base(1.0)));
        assert!(heuristic_from_scaled_distance_with_base(-0.1, 1.0).is_err());
        assert!(heuristic_from_scaled_distance_with_base(f64::NAN, 1.0).is_err());
        assert!(heuristic_from_scaled_distance_with_base(0.5, -1.0).is_err());
    }

    #[test]
    fn test_heuristic_decreases_with_distance() {
        let mut previous = 1.0;
        for d in [0.5, 1.0, 10.0, 1e3, 1e9] {
            let h = heuristic_from_scaled_distance_with_base(H_NOT_NULL, d).unwrap();
            assert!(h < previous, "h({})={} should be < {}", d, h, previous);
            assert!(h > H_NOT_NULL);
            previous = h;
        }
    }

    #[test]
    fn test_scale_heuristic_with_base() {
        assert_eq!(scale_heuristic_with_base(0.0, 0.2).unwrap(), 0.2);
        assert!((scale_heuristic_with_base(0.5, 0.2).unwrap() - 0.6).abs() < 1e-12);
        assert!(scale_heuristic_with_base(1.0, 0.2).is_err());
        assert!(scale_heuristic_with_base(0.5, 1.0).is_err());
    }

    // ── characters and ranges ────────────────────────────────────────────

    #[test]
    fn test_distance_to_digit() {
        assert_eq!(distance_to_digit('0'), 0);
        assert_eq!(distance_to_digit('5'), 0);
        assert_eq!(distance_to_digit('9'), 0);
        assert_eq!(distance_to_digit('/'), 1);
        assert_eq!(distance_to_digit(':'), 1);
        assert_eq!(distance_to_digit('a'), 'a' as u32 - '9' as u32);
    }

    #[test]
    fn test_distance_to_range() {
        assert_eq!(distance_to_range('c', 'a', 'z').unwrap(), 0);
        assert_eq!(distance_to_range('A', 'a', 'z').unwrap(), 'a' as u32 - 'A' as u32);
        assert_eq!(distance_to_range('~', 'a', 'z').unwrap(), '~' as u32 - 'z' as u32);
        assert_eq!(distance_to_range('q', 'q', 'q').unwrap(), 0);
        assert!(matches!(
            distance_to_range('c', 'z', 'a'),
            Err(InvalidArgument::Range { .. })
        ));
    }

    #[test]
    fn test_distance_to_int_range_extremes() {
        assert_eq!(distance_to_int_range(i64::MIN, i64::MAX, i64::MAX).unwrap(), u64::MAX);
        assert_eq!(distance_to_int_range(i64::MAX, i64::MIN, 0).unwrap(), i64::MAX as u64);
    }

    #[test]
    fn test_distance_to_char() {
        assert_eq!(distance_to_char('a', 'a'), 0);
        assert_eq!(distance_to_char('a', 'd'), 3);
        assert_eq!(distance_to_char('d', 'a'), 3);
    }

    // ── left alignment ───────────────────────────────────────────────────

    #[test]
    fn test_left_alignment_same_length() {
        let cs = StringComparison::CaseSensitive;
        assert_eq!(left_alignment_distance("abc", "abc", cs), 0);
        assert_eq!(left_alignment_distance("abc", "abd", cs), 1);
        assert_eq!(left_alignment_distance("hello", "hellp", cs), 1);
    }

    #[test]
    fn test_left_alignment_length_mismatch_dominates() {
        let cs = StringComparison::CaseSensitive;
        assert_eq!(left_alignment_distance("", "ab", cs), 2 * MAX_CHAR_DISTANCE);
        assert_eq!(left_alignment_distance("ab", "abc", cs), MAX_CHAR_DISTANCE);
        // worst same-length single-unit delta is still below one length unit
        assert!(left_alignment_distance("\u{0}", "\u{ffff}", cs) < MAX_CHAR_DISTANCE);
    }

    #[test]
    fn test_left_alignment_case_insensitive() {
        assert_eq!(left_alignment_distance("HeLLo", "hello", StringComparison::CaseInsensitive), 0);
        assert_eq!(
            left_alignment_distance("HeLLo", "hello", StringComparison::CaseSensitive),
            3 * u64::from(b'h' - b'H')
        );
    }

    // ── equality distance ────────────────────────────────────────────────

    #[test]
    fn test_distance_to_equality_numbers() {
        assert_eq!(distance_to_equality(&5i32, &5i32), 0.0);
        assert_eq!(distance_to_equality(&5i32, &7i32), 2.0);
        assert_eq!(distance_to_equality(&-3i64, &4i64), 7.0);
        assert_eq!(distance_to_equality(&1.5f64, &-1.0f64), 2.5);
        assert_eq!(distance_to_equality(&'a', &'c'), 2.0);
    }

    #[test]
    fn test_distance_to_equality_non_finite() {
        assert_eq!(distance_to_equality(&f64::INFINITY, &f64::INFINITY), 0.0);
        assert_eq!(distance_to_equality(&f64::NEG_INFINITY, &f64::NEG_INFINITY), 0.0);
        assert_eq!(distance_to_equality(&f64::INFINITY, &5.0), MAX_DISTANCE);
        assert_eq!(distance_to_equality(&f64::INFINITY, &f64::NEG_INFINITY), MAX_DISTANCE);
        assert_eq!(distance_to_equality(&f64::NAN, &f64::NAN), MAX_DISTANCE);
        assert_eq!(distance_to_equality(&1.0, &f64::NAN), MAX_DISTANCE);
    }

    #[test]
    fn test_distance_to_equality_overflow_saturates() {
        assert_eq!(distance_to_equality(&f64::MAX, &-f64::MAX), MAX_DISTANCE);
        assert_eq!(distance_to_equality(&i64::MIN, &i64::MAX), (i64::MAX as f64) * 2.0);
    }

    #[test]
    fn test_distance_to_equality_dates() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(distance_to_equality(&a, &b), 2.0 * 86_400.0);

        let epoch = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        let dt = epoch.and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(distance_to_equality(&dt, &NaiveDateTime::UNIX_EPOCH), 86_400.0);

        let t1 = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let t2 = NaiveTime::from_hms_opt(10, 1, 30).unwrap();
        assert_eq!(distance_to_equality(&t1, &t2), 90.0);

        let i1 = dt.and_utc();
        let i2 = NaiveDateTime::UNIX_EPOCH.and_utc();
        assert_eq!(distance_to_equality(&i1, &i2), 86_400.0);
    }

    #[test]
    fn test_naive_date_uses_unix_epoch_scale() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(i64::from(epoch.num_days_from_ce()), UNIX_EPOCH_DAYS_FROM_CE);
    }

    // ── dynamic dispatch ─────────────────────────────────────────────────

    #[test]
    fn test_distance_dispatches_on_matching_kinds() {
        let d = distance(Some(&Value::Int(3)), Some(&Value::Int(10))).unwrap();
        assert_eq!(d, 7.0);
        let d = distance(Some(&Value::from("abc")), Some(&Value::from("abd"))).unwrap();
        assert_eq!(d, 1.0);
        let d = distance(Some(&Value::Char('x')), Some(&Value::Char('z'))).unwrap();
        assert_eq!(d, 2.0);
    }

    #[test]
    fn test_distance_mismatched_kinds_is_max() {
        let d = distance(Some(&Value::Int(3)), Some(&Value::Long(3))).unwrap();
        assert_eq!(d, MAX_DISTANCE);
        let d = distance(Some(&Value::Other("[]".into())), Some(&Value::Other("[]".into()))).unwrap();
        assert_eq!(d, MAX_DISTANCE);
    }

    #[test]
    fn test_distance_missing_operand_is_an_error() {
        assert_eq!(
            distance(None, Some(&Value::Int(1))),
            Err(InvalidArgument::Missing("left operand"))
        );
        assert_eq!(
            distance(Some(&Value::Int(1)), None),
            Err(InvalidArgument::Missing("right operand"))
        );
    }
}
