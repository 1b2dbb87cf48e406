/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Heuristics for primitive comparison jumps.
//!
//! Compilers lower `==`, `!=`, `<`, `<=`, `>`, `>=` into conditional jumps.
//! Only two of them carry a numeric rule here, equality and less-than; the
//! other four are reduced to those by swapping operands and/or negating:
//!
//! ```text
//! a != b  →  !(a == b)
//! a >= b  →  !(a <  b)
//! a <= b  →  !(b <  a)
//! a >  b  →    b <  a
//! ```
//!
//! # Floating point
//!
//! Ordered comparisons involving NaN are false. The *unordered* variants
//! (CIL `bne.un`, `blt.un`, … ) are true when NaN is involved. Negating an
//! ordered comparison yields an unordered one and vice versa, so the flag of
//! the base rule is flipped whenever a reduction inverts the result.
//!
//! For integral operands the same flag selects an unsigned comparison.
//!
//! # Invariants
//!
//! - **BJ-001**: `NE(a,b) == invert(EQ(a,b))` and `GE(a,b) == invert(LT(a,b))`.
//! - **BJ-002**: `LE(a,b) == invert(LT(b,a))` and `GT(a,b) == LT(b,a)`.
//! - **BJ-003**: a less-than proximity never reaches 1, even at distance 0.

use core::fmt;
use core::str::FromStr;

use crate::distance::{distance_to_equality, inverse_distance, MAX_DISTANCE};
use crate::error::{InvalidArgument, Result};
use crate::truthness::Truthness;

// ─── Operators ──────────────────────────────────────────────────────────────

/// A two-operand comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComparisonOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl ComparisonOp {
    /// All operators, in declaration order.
    pub const ALL: [ComparisonOp; 6] = [
        ComparisonOp::Eq,
        ComparisonOp::Ne,
        ComparisonOp::Lt,
        ComparisonOp::Le,
        ComparisonOp::Gt,
        ComparisonOp::Ge,
    ];

    /// Source-level spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        }
    }

    /// The operator that holds exactly when `self` does not.
    pub fn negate(self) -> Self {
        match self {
            ComparisonOp::Eq => ComparisonOp::Ne,
            ComparisonOp::Ne => ComparisonOp::Eq,
            ComparisonOp::Lt => ComparisonOp::Ge,
            ComparisonOp::Ge => ComparisonOp::Lt,
            ComparisonOp::Le => ComparisonOp::Gt,
            ComparisonOp::Gt => ComparisonOp::Le,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Error returned when parsing an unknown operator symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownOperator;

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown comparison operator")
    }
}

impl FromStr for ComparisonOp {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        ComparisonOp::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or(UnknownOperator)
    }
}

/// An operator plus the unordered (float) / unsigned (integer) flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comparison {
    /// The operator.
    pub op: ComparisonOp,
    /// Holds on NaN for floats; unsigned comparison for integers.
    pub unordered: bool,
}

impl Comparison {
    /// Ordered / signed comparison.
    pub const fn ordered(op: ComparisonOp) -> Self {
        Self { op, unordered: false }
    }

    /// Unordered / unsigned comparison.
    pub const fn unordered(op: ComparisonOp) -> Self {
        Self { op, unordered: true }
    }
}

impl From<ComparisonOp> for Comparison {
    fn from(op: ComparisonOp) -> Self {
        Comparison::ordered(op)
    }
}

// ─── Reduction table ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BaseOp {
    Eq,
    Lt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Reduction {
    base: BaseOp,
    swapped: bool,
    inverted: bool,
}

const fn reduce(op: ComparisonOp) -> Reduction {
    let (base, swapped, inverted) = match op {
        ComparisonOp::Eq => (BaseOp::Eq, false, false),
        ComparisonOp::Ne => (BaseOp::Eq, false, true),
        ComparisonOp::Lt => (BaseOp::Lt, false, false),
        ComparisonOp::Ge => (BaseOp::Lt, false, true),
        ComparisonOp::Le => (BaseOp::Lt, true, true),
        ComparisonOp::Gt => (BaseOp::Lt, true, false),
    };
    Reduction {
        base,
        swapped,
        inverted,
    }
}

// ─── Base rules ─────────────────────────────────────────────────────────────

/// Offset keeping the less-than proximity below 1 when the operands tie.
const LESS_THAN_OFFSET: f64 = 1.1;

fn equality(outcome: bool, distance: f64) -> Truthness {
    if outcome {
        Truthness::TRUE
    } else {
        Truthness::when_false(inverse_distance(distance))
    }
}

fn less_than(outcome: bool, distance: f64) -> Truthness {
    Truthness::from_outcome(outcome, 1.0 / (LESS_THAN_OFFSET + distance))
}

fn float_base(base: BaseOp, a: f64, b: f64, unordered: bool) -> Truthness {
    if a.is_nan() || b.is_nan() {
        let rule = match base {
            BaseOp::Eq => equality,
            BaseOp::Lt => less_than,
        };
        return rule(unordered, MAX_DISTANCE);
    }
    let distance = distance_to_equality(&a, &b);
    match base {
        BaseOp::Eq => equality(a == b, distance),
        BaseOp::Lt => less_than(a < b, distance),
    }
}

fn integer_base(base: BaseOp, a: i64, b: i64, unsigned: bool) -> Truthness {
    let (outcome, distance) = if unsigned {
        let (x, y) = (a as u64, b as u64);
        let outcome = match base {
            BaseOp::Eq => x == y,
            BaseOp::Lt => x < y,
        };
        (outcome, distance_to_equality(&x, &y))
    } else {
        let outcome = match base {
            BaseOp::Eq => a == b,
            BaseOp::Lt => a < b,
        };
        (outcome, distance_to_equality(&a, &b))
    };
    match base {
        BaseOp::Eq => equality(outcome, distance),
        BaseOp::Lt => less_than(outcome, distance),
    }
}

// ─── Public mapper ──────────────────────────────────────────────────────────

/// Truthness of `a <op> b` over integral operands (widened to `i64`).
///
/// With `comparison.unordered` the operands are reinterpreted as unsigned.
pub fn for_value_comparison(a: i64, b: i64, comparison: Comparison) -> Truthness {
    let r = reduce(comparison.op);
    let (x, y) = if r.swapped { (b, a) } else { (a, b) };
    let t = integer_base(r.base, x, y, comparison.unordered);
    if r.inverted {
        t.invert()
    } else {
        t
    }
}

/// Truthness of `a <op> b` over floating-point operands.
pub fn for_float_comparison(a: f64, b: f64, comparison: Comparison) -> Truthness {
    let r = reduce(comparison.op);
    let (x, y) = if r.swapped { (b, a) } else { (a, b) };
    // !(x < y) is true on NaN exactly when (x < y) is false on NaN
    let t = float_base(r.base, x, y, comparison.unordered ^ r.inverted);
    if r.inverted {
        t.invert()
    } else {
        t
    }
}

/// Truthness of `value <op> 0`, the single-operand jumps (`ifeq`, `brtrue`, …).
pub fn for_single_value_jump(value: i64, op: ComparisonOp) -> Truthness {
    for_value_comparison(value, 0, Comparison::ordered(op))
}

/// Truthness of a reference identity check (`a == b` / `a != b` on objects).
pub fn for_reference_comparison(same: bool, op: ComparisonOp) -> Result<Truthness> {
    let t = if same { Truthness::TRUE } else { Truthness::FALSE };
    match op {
        ComparisonOp::Eq => Ok(t),
        ComparisonOp::Ne => Ok(t.invert()),
        other => Err(InvalidArgument::UnsupportedOperator(other)),
    }
}

/// Truthness of a null check: `Eq` is `x == null`, `Ne` is `x != null`.
pub fn for_null_comparison(is_null: bool, op: ComparisonOp) -> Result<Truthness> {
    for_reference_comparison(is_null, op)
}

/// A primitive operand as captured at a jump site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    /// Integral value widened to 64 bits.
    Int(i64),
    /// Floating-point value widened to 64 bits.
    Float(f64),
}

impl Operand {
    /// Short name of the operand kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Int(_) => "int",
            Operand::Float(_) => "float",
        }
    }
}

/// Inbound entry point for primitive jump sites.
///
/// Both operands must be of the same kind; mixing them is an instrumentation
/// bug since the compiler always converts operands before a comparison.
pub fn compute_comparison_truthness(
    left: Operand,
    comparison: Comparison,
    right: Operand,
) -> Result<Truthness> {
    match (left, right) {
        (Operand::Int(a), Operand::Int(b)) => Ok(for_value_comparison(a, b, comparison)),
        (Operand::Float(a), Operand::Float(b)) => Ok(for_float_comparison(a, b, comparison)),
        (l, r) => Err(InvalidArgument::MismatchedOperands {
            left: l.kind(),
            right: r.kind(),
        }),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
