//! Usage errors raised by the heuristic engine.
//!
//! Every variant describes a malformed call from the instrumentation layer.
//! Numeric overflow is never reported here: distances saturate instead.

use crate::jumps::ComparisonOp;

/// An argument the caller should never have passed.
///
/// These are programmer errors in the calling instrumentation and are meant
/// to surface as-is, not to be retried or clamped away.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InvalidArgument {
    /// A truthness pair violating the "exactly one side is 1" rule or the `[0,1]` bounds.
    #[error("invalid truthness (of_true={of_true}, of_false={of_false}): {reason}")]
    Truthness {
        /// Offending `of_true`.
        of_true: f64,
        /// Offending `of_false`.
        of_false: f64,
        /// Which rule was broken.
        reason: &'static str,
    },

    /// A distance below zero (or NaN).
    #[error("negative distance: {0}")]
    NegativeDistance(f64),

    /// A delta that is zero, negative or NaN.
    #[error("invalid delta {0}: must be strictly positive")]
    Delta(f64),

    /// A heuristic base outside `[0,1)`.
    #[error("invalid base {0}: must lie in [0, 1)")]
    Base(f64),

    /// A heuristic value outside `[0,1)`.
    #[error("invalid heuristic {0}: must lie in [0, 1)")]
    Heuristic(f64),

    /// A range whose lower bound exceeds its upper bound.
    #[error("invalid range [{min}, {max}]")]
    Range {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// A required operand was absent (the host language would have thrown a null dereference).
    #[error("missing required {0}")]
    Missing(&'static str),

    /// Two operands of different kinds handed to a primitive comparison.
    #[error("mismatched operand kinds: {left} vs {right}")]
    MismatchedOperands {
        /// Kind of the left operand.
        left: &'static str,
        /// Kind of the right operand.
        right: &'static str,
    },

    /// An operator that has no meaning for the operands, e.g. `<` on references.
    #[error("operator `{0}` is not supported here")]
    UnsupportedOperator(ComparisonOp),
}

/// Crate-wide result alias.
pub type Result<T, E = InvalidArgument> = core::result::Result<T, E>;
