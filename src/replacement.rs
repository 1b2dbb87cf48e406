/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Heuristics for replaced library calls.
//!
//! Boolean library calls such as `equals` or `startsWith` hide their branch
//! inside the library, where the jump mapper never sees it. Instrumentation
//! swaps each such call for one of the functions below: it performs the
//! original computation, and when given a [`Target`] it also scores how close
//! the call came to the opposite answer and reports that score.
//!
//! String lengths, offsets and characters are UTF-16 code units throughout.
//!
//! # Invariants
//!
//! - **RH-001**: a reported truthness is true exactly when `result` is true.
//! - **RH-002**: without a target nothing is computed or recorded.
//! - **RH-003**: a heuristic never reports both sides as `1.0`.

use alloc::vec::Vec;

use crate::distance::{
    distance, heuristic_from_scaled_distance_with_base, inverse_distance, left_alignment_units,
    StringComparison, H_NOT_EMPTY, H_NOT_NULL, H_REACHED_BUT_NULL, MAX_CHAR_DISTANCE,
};
use crate::error::{InvalidArgument, Result};
use crate::sink::Target;
use crate::truthness::Truthness;
use crate::value::Value;

/// Outcome of a replaced call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Replaced {
    /// What the original call returns.
    pub result: bool,
    /// The recorded heuristic, present only when a target was given.
    pub truthness: Option<Truthness>,
}

fn observe(
    result: bool,
    target: Option<Target<'_>>,
    heuristic: impl FnOnce() -> Result<Truthness>,
) -> Result<Replaced> {
    let truthness = match target {
        Some(target) => {
            let t = heuristic()?;
            debug_assert_eq!(t.is_true(), result, "heuristic disagrees with {}", target.id());
            target.record(t);
            Some(t)
        }
        None => None,
    };
    Ok(Replaced { result, truthness })
}

// ─── Code-unit helpers ──────────────────────────────────────────────────────

fn equality_units(a: &[u16], b: &[u16]) -> Result<Truthness> {
    if a == b {
        return Ok(Truthness::when_true(H_NOT_NULL));
    }
    let d = left_alignment_units(a, b) as f64;
    Ok(Truthness::when_false(heuristic_from_scaled_distance_with_base(H_NOT_NULL, d)?))
}

/// Window `caller[offset..offset + prefix.len()]`, if it lies inside `caller`.
fn window<'a>(caller: &'a [u16], prefix: &[u16], offset: i64) -> Option<&'a [u16]> {
    let start = usize::try_from(offset).ok()?;
    caller.get(start..start.checked_add(prefix.len())?)
}

fn starts_with_units(caller: &[u16], prefix: &[u16], offset: i64) -> Result<Truthness> {
    if let Some(w) = window(caller, prefix, offset) {
        return equality_units(w, prefix);
    }
    let cl = caller.len() as f64;
    let pl = prefix.len() as f64;
    let offset = offset as f64;
    let penalty = pl + (pl - cl).max(0.0);
    // both arms count code units that must change; scale them like a length gap
    let units = if offset < 0.0 {
        -offset + cl + penalty
    } else {
        offset - (cl - pl) + penalty
    };
    let d = units * MAX_CHAR_DISTANCE as f64;
    Ok(Truthness::when_false(inverse_distance(d)))
}

fn contains_units(caller: &[u16], needle: &[u16]) -> bool {
    needle.is_empty() || caller.windows(needle.len()).any(|w| w == needle)
}

// ─── Pure heuristics ────────────────────────────────────────────────────────

/// Truthness of `left.equals(right)` for dynamically-typed operands.
///
/// A missing `right` is reachable but useless, so it scores
/// [`H_REACHED_BUT_NULL`]. Otherwise the distance between the two values is
/// mapped above [`H_NOT_NULL`], so any non-null argument beats a null one.
pub fn equality_truthness(left: &Value, right: Option<&Value>) -> Result<Truthness> {
    let Some(right) = right else {
        return Ok(Truthness::when_false(H_REACHED_BUT_NULL));
    };
    if left.same_value(right) {
        return Ok(Truthness::when_true(H_NOT_NULL));
    }
    let d = distance(Some(left), Some(right))?;
    Ok(Truthness::when_false(heuristic_from_scaled_distance_with_base(H_NOT_NULL, d)?))
}

/// Truthness of `caller.equals(other)`.
pub fn string_equality_truthness(
    caller: &str,
    other: Option<&str>,
    mode: StringComparison,
) -> Result<Truthness> {
    match other {
        Some(other) => equality_units(&mode.units(caller), &mode.units(other)),
        None => Ok(Truthness::when_false(H_REACHED_BUT_NULL)),
    }
}

/// Truthness of `caller.startsWith(prefix, offset)`.
///
/// An offset that puts the prefix outside `caller` scores by how many code
/// units are out of place; a negative offset also pays for the whole caller,
/// since no change to the caller can make it valid.
pub fn starts_with_truthness(
    caller: &str,
    prefix: &str,
    offset: i64,
    mode: StringComparison,
) -> Result<Truthness> {
    starts_with_units(&mode.units(caller), &mode.units(prefix), offset)
}

/// Truthness of `caller.endsWith(suffix)`.
pub fn ends_with_truthness(caller: &str, suffix: &str, mode: StringComparison) -> Result<Truthness> {
    let (c, s) = (mode.units(caller), mode.units(suffix));
    starts_with_units(&c, &s, c.len() as i64 - s.len() as i64)
}

/// Truthness of `caller.contains(needle)`.
///
/// When not found, the score is that of the best-aligned window of
/// `needle.len()` code units.
pub fn contains_truthness(caller: &str, needle: &str, mode: StringComparison) -> Result<Truthness> {
    let (c, n) = (mode.units(caller), mode.units(needle));
    if c.len() <= n.len() {
        return equality_units(&c, &n);
    }
    if contains_units(&c, &n) {
        return Ok(Truthness::when_true(H_NOT_NULL));
    }
    let best = c
        .windows(n.len())
        .map(|w| left_alignment_units(w, &n))
        .min()
        .unwrap_or(u64::MAX);
    Ok(Truthness::when_false(inverse_distance(best as f64)))
}

/// Truthness of `caller.isEmpty()`.
pub fn empty_truthness(caller: &str) -> Truthness {
    match caller.encode_utf16().count() {
        0 => Truthness::when_true(H_NOT_EMPTY),
        len => Truthness::when_false(inverse_distance(len as f64)),
    }
}

// ─── Replacements ───────────────────────────────────────────────────────────

fn required<T>(value: Option<T>, what: &'static str) -> Result<T> {
    value.ok_or(InvalidArgument::Missing(what))
}

/// Replacement for `Object.equals(Object)`.
pub fn object_equals(
    left: Option<&Value>,
    right: Option<&Value>,
    target: Option<Target<'_>>,
) -> Result<Replaced> {
    let left = required(left, "caller")?;
    let result = right.is_some_and(|r| left.same_value(r));
    observe(result, target, || equality_truthness(left, right))
}

/// Replacement for `String.equals(Object)` and `String.equalsIgnoreCase(String)`.
///
/// `other` values that are not strings compare unequal and score like a
/// missing argument.
pub fn string_equals(
    caller: Option<&str>,
    other: Option<&Value>,
    mode: StringComparison,
    target: Option<Target<'_>>,
) -> Result<Replaced> {
    let caller = required(caller, "caller")?;
    let other = match other {
        Some(Value::Str(s)) => Some(s.as_str()),
        _ => None,
    };
    let result = other.is_some_and(|o| mode.units(caller) == mode.units(o));
    observe(result, target, || string_equality_truthness(caller, other, mode))
}

/// Replacement for `String.startsWith(String, int)`; pass `0` for the one-argument form.
pub fn string_starts_with(
    caller: Option<&str>,
    prefix: Option<&str>,
    offset: i64,
    mode: StringComparison,
    target: Option<Target<'_>>,
) -> Result<Replaced> {
    let caller = mode.units(required(caller, "caller")?);
    let prefix = mode.units(required(prefix, "prefix")?);
    let result = window(&caller, &prefix, offset).is_some_and(|w| w == prefix.as_slice());
    observe(result, target, || starts_with_units(&caller, &prefix, offset))
}

/// Replacement for `String.endsWith(String)`.
pub fn string_ends_with(
    caller: Option<&str>,
    suffix: Option<&str>,
    mode: StringComparison,
    target: Option<Target<'_>>,
) -> Result<Replaced> {
    let caller = required(caller, "caller")?;
    let suffix = required(suffix, "suffix")?;
    let (c, s): (Vec<u16>, Vec<u16>) = (mode.units(caller), mode.units(suffix));
    let result = c.ends_with(&s);
    observe(result, target, || ends_with_truthness(caller, suffix, mode))
}

/// Replacement for `String.contains(CharSequence)`.
pub fn string_contains(
    caller: Option<&str>,
    needle: Option<&str>,
    mode: StringComparison,
    target: Option<Target<'_>>,
) -> Result<Replaced> {
    let caller = required(caller, "caller")?;
    let needle = required(needle, "needle")?;
    let result = contains_units(&mode.units(caller), &mode.units(needle));
    observe(result, target, || contains_truthness(caller, needle, mode))
}

/// Replacement for `String.isEmpty()`.
pub fn string_is_empty(caller: Option<&str>, target: Option<Target<'_>>) -> Result<Replaced> {
    let caller = required(caller, "caller")?;
    observe(caller.is_empty(), target, || Ok(empty_truthness(caller)))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
