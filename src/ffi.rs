//! Python FFI bindings via PyO3.
//!
//! Exposes the heuristics to Python-side instrumentation and search drivers.
//! Strings cross the boundary as Python `str`; numbers as `int` or `float`.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from truthness_core import compare, string_equals, contains
//!
//! t = compare(3, "<", 103)
//! print(t.of_true, t.of_false)       # 1.0 0.00989...
//! print(string_equals("hello", "hellp").of_true)   # 0.55
//! print(contains("xxfopxx", "foo").of_true)        # 0.5
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::distance::{self, StringComparison};
use crate::error::InvalidArgument;
use crate::jumps::{compute_comparison_truthness, Comparison, ComparisonOp, Operand};
use crate::replacement;
use crate::truthness::Truthness as RustTruthness;

impl From<InvalidArgument> for PyErr {
    fn from(e: InvalidArgument) -> Self {
        PyValueError::new_err(e.to_string())
    }
}

fn comparison_mode(ignore_case: bool) -> StringComparison {
    if ignore_case {
        StringComparison::CaseInsensitive
    } else {
        StringComparison::CaseSensitive
    }
}

// ── Truthness ─────────────────────────────────────────────────────────────────

/// How true / how false one evaluation of a comparison was.
///
/// Exactly one of `of_true` / `of_false` is 1.0.
#[pyclass(name = "Truthness", frozen)]
#[derive(Clone)]
pub struct PyTruthness {
    inner: RustTruthness,
}

impl From<RustTruthness> for PyTruthness {
    fn from(inner: RustTruthness) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PyTruthness {
    /// Create a Truthness; raises ValueError unless exactly one side is 1.0.
    #[new]
    pub fn new(of_true: f64, of_false: f64) -> PyResult<Self> {
        Ok(RustTruthness::new(of_true, of_false)?.into())
    }

    /// Closeness to the true outcome.
    #[getter]
    pub fn of_true(&self) -> f64 {
        self.inner.of_true()
    }

    /// Closeness to the false outcome.
    #[getter]
    pub fn of_false(&self) -> f64 {
        self.inner.of_false()
    }

    /// Whether the comparison evaluated to true.
    pub fn is_true(&self) -> bool {
        self.inner.is_true()
    }

    /// Whether the comparison evaluated to false.
    pub fn is_false(&self) -> bool {
        self.inner.is_false()
    }

    /// Truthness of the negated comparison.
    pub fn invert(&self) -> Self {
        self.inner.invert().into()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "Truthness(of_true={}, of_false={})",
            self.inner.of_true(),
            self.inner.of_false()
        )
    }
}

// ── Jumps ─────────────────────────────────────────────────────────────────────

#[derive(FromPyObject)]
enum PyOperand {
    Int(i64),
    Float(f64),
}

impl From<PyOperand> for Operand {
    fn from(o: PyOperand) -> Self {
        match o {
            PyOperand::Int(v) => Operand::Int(v),
            PyOperand::Float(v) => Operand::Float(v),
        }
    }
}

/// Truthness of `left <op> right` for two ints or two floats.
///
/// Args:
///     op: one of "==", "!=", "<", "<=", ">", ">="
///     unordered: floats: hold when NaN is involved; ints: compare unsigned
#[pyfunction]
#[pyo3(signature = (left, op, right, unordered=false))]
fn compare(left: PyOperand, op: &str, right: PyOperand, unordered: bool) -> PyResult<PyTruthness> {
    let op: ComparisonOp = op
        .parse()
        .map_err(|e| PyValueError::new_err(format!("{e}: {op:?}")))?;
    let comparison = Comparison { op, unordered };
    Ok(compute_comparison_truthness(left.into(), comparison, right.into())?.into())
}

// ── Distances ─────────────────────────────────────────────────────────────────

/// Absolute difference of two numbers, saturating at the largest float.
#[pyfunction]
fn distance_to_equality(a: f64, b: f64) -> f64 {
    distance::distance_to_equality(&a, &b)
}

/// Positional distance between two strings (UTF-16 code units).
#[pyfunction]
#[pyo3(signature = (a, b, ignore_case=false))]
fn left_alignment_distance(a: &str, b: &str, ignore_case: bool) -> u64 {
    distance::left_alignment_distance(a, b, comparison_mode(ignore_case))
}

/// Map a distance onto (base, 1].
#[pyfunction]
fn heuristic_from_scaled_distance_with_base(base: f64, distance: f64) -> PyResult<f64> {
    Ok(distance::heuristic_from_scaled_distance_with_base(base, distance)?)
}

// ── String replacements ───────────────────────────────────────────────────────

/// Truthness of `caller == other`; `other=None` stands for a null argument.
#[pyfunction]
#[pyo3(signature = (caller, other, ignore_case=false))]
fn string_equals(caller: &str, other: Option<&str>, ignore_case: bool) -> PyResult<PyTruthness> {
    Ok(replacement::string_equality_truthness(caller, other, comparison_mode(ignore_case))?.into())
}

/// Truthness of `caller.startswith(prefix)` at a code-unit offset.
#[pyfunction]
#[pyo3(signature = (caller, prefix, offset=0, ignore_case=false))]
fn starts_with(caller: &str, prefix: &str, offset: i64, ignore_case: bool) -> PyResult<PyTruthness> {
    Ok(replacement::starts_with_truthness(caller, prefix, offset, comparison_mode(ignore_case))?.into())
}

/// Truthness of `caller.endswith(suffix)`.
#[pyfunction]
#[pyo3(signature = (caller, suffix, ignore_case=false))]
fn ends_with(caller: &str, suffix: &str, ignore_case: bool) -> PyResult<PyTruthness> {
    Ok(replacement::ends_with_truthness(caller, suffix, comparison_mode(ignore_case))?.into())
}

/// Truthness of `needle in caller`.
#[pyfunction]
#[pyo3(signature = (caller, needle, ignore_case=false))]
fn contains(caller: &str, needle: &str, ignore_case: bool) -> PyResult<PyTruthness> {
    Ok(replacement::contains_truthness(caller, needle, comparison_mode(ignore_case))?.into())
}

/// Truthness of `len(caller) == 0`.
#[pyfunction]
fn is_empty(caller: &str) -> PyTruthness {
    replacement::empty_truthness(caller).into()
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Branch-distance heuristics for search-based test generation.
#[pymodule]
pub fn truthness_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTruthness>()?;
    m.add_function(wrap_pyfunction!(compare, m)?)?;
    m.add_function(wrap_pyfunction!(distance_to_equality, m)?)?;
    m.add_function(wrap_pyfunction!(left_alignment_distance, m)?)?;
    m.add_function(wrap_pyfunction!(heuristic_from_scaled_distance_with_base, m)?)?;
    m.add_function(wrap_pyfunction!(string_equals, m)?)?;
    m.add_function(wrap_pyfunction!(starts_with, m)?)?;
    m.add_function(wrap_pyfunction!(ends_with, m)?)?;
    m.add_function(wrap_pyfunction!(contains, m)?)?;
    m.add_function(wrap_pyfunction!(is_empty, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("H_NOT_NULL", distance::H_NOT_NULL)?;
    m.add("H_REACHED_BUT_NULL", distance::H_REACHED_BUT_NULL)?;
    Ok(())
}
