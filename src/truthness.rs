/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! The truthness of a single observed boolean-producing comparison.
//!
//! A [`Truthness`] holds two companion scores: how close the comparison was to
//! evaluating `true`, and how close it was to evaluating `false`. The side that
//! actually happened is exactly `1.0`; the other side is a proximity score in
//! `[0, 1)` where higher means closer to flipping.
//!
//! # Invariants
//!
//! - **TH-001**: both scores lie in `[0.0, 1.0]`.
//! - **TH-002**: exactly one score equals `1.0`.
//! - **TH-003**: `invert(invert(t)) == t`.

use crate::error::{InvalidArgument, Result};

/// Largest `f64` strictly below one.
pub const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// How true / how false one dynamic evaluation of a comparison was.
///
/// Immutable and `Copy`; freely shared across threads.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTruthness"))]
pub struct Truthness {
    of_true: f64,
    of_false: f64,
}

impl Truthness {
    /// A comparison that was true with no information about the false side.
    pub const TRUE: Truthness = Truthness { of_true: 1.0, of_false: 0.0 };

    /// A comparison that was false with no information about the true side.
    pub const FALSE: Truthness = Truthness { of_true: 0.0, of_false: 1.0 };

    /// Build a truthness, validating TH-001 and TH-002.
    pub fn new(of_true: f64, of_false: f64) -> Result<Self> {
        let reject = |reason| {
            Err(InvalidArgument::Truthness {
                of_true,
                of_false,
                reason,
            })
        };
        if !(0.0..=1.0).contains(&of_true) || !(0.0..=1.0).contains(&of_false) {
            return reject("scores must lie in [0, 1]");
        }
        match (of_true == 1.0, of_false == 1.0) {
            (true, true) => reject("both sides cannot be 1"),
            (false, false) => reject("one side must be 1"),
            _ => Ok(Self { of_true, of_false }),
        }
    }

    /// The comparison was true; `of_false` scores how close it came to false.
    ///
    /// The proximity is clamped into `[0, BELOW_ONE]`, which only absorbs
    /// rounding such as `1/(1+d)` collapsing to `1` for a tiny `d`.
    pub fn when_true(of_false: f64) -> Self {
        Self {
            of_true: 1.0,
            of_false: proximity(of_false),
        }
    }

    /// The comparison was false; `of_true` scores how close it came to true.
    pub fn when_false(of_true: f64) -> Self {
        Self {
            of_true: proximity(of_true),
            of_false: 1.0,
        }
    }

    /// Build from the actual outcome and the proximity of the opposite outcome.
    pub fn from_outcome(outcome: bool, opposite: f64) -> Self {
        if outcome {
            Self::when_true(opposite)
        } else {
            Self::when_false(opposite)
        }
    }

    /// Score for the true side.
    pub fn of_true(&self) -> f64 {
        self.of_true
    }

    /// Score for the false side.
    pub fn of_false(&self) -> f64 {
        self.of_false
    }

    /// `true` if the observed comparison evaluated to true.
    pub fn is_true(&self) -> bool {
        self.of_true == 1.0
    }

    /// `true` if the observed comparison evaluated to false.
    pub fn is_false(&self) -> bool {
        self.of_false == 1.0
    }

    /// The truthness of the logical negation: fields swapped.
    #[must_use]
    pub fn invert(&self) -> Self {
        Self {
            of_true: self.of_false,
            of_false: self.of_true,
        }
    }
}

fn proximity(h: f64) -> f64 {
    if h.is_nan() {
        0.0
    } else {
        h.clamp(0.0, BELOW_ONE)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTruthness {
    of_true: f64,
    of_false: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTruthness> for Truthness {
    type Error = InvalidArgument;

    fn try_from(raw: RawTruthness) -> Result<Self> {
        Truthness::new(raw.of_true, raw.of_false)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
