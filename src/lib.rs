//! # truthness-core
//!
//! Branch-distance heuristics for search-based test generation.
//!
//! ---
//!
//! ## A coverage fitness that can be climbed
//!
//! Knowing that a branch was *not* taken says nothing about how to take it.
//! Every comparison the instrumented program evaluates is therefore scored
//! twice: how close it came to being true, and how close to being false.
//!
//! **Truthness** — a pair of scores in `[0, 1]`. The outcome that happened
//! reads exactly `1.0`; the other side grows as the operands get closer to
//! flipping it.
//!
//! **Distances** — how far operands are from satisfying a comparison:
//! absolute differences for numbers, code-unit alignment for strings, seconds
//! for dates. Distances saturate, they never overflow.
//!
//! **Replacement heuristics** — boolean library calls (`equals`,
//! `startsWith`, `contains`, …) hide their branches. Instrumentation replaces
//! them with calls that return the same result and additionally score it.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! comparison / call site → jumps | replacement → Truthness → ObservationSink
//!                                 ↑                                  ↓
//!                             distance                     BestTruthnessRegistry
//!                                                                    ↓
//!                                                          ObservationBatch (serde)
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`truthness`] | [`Truthness`] | Validated how-true / how-false pair |
//! | [`distance`] | [`StringComparison`], [`EqualityDistance`] | Saturating distances and distance → heuristic mapping |
//! | [`value`] | [`Value`] | Tagged operands for generic `equals` |
//! | [`jumps`] | [`ComparisonOp`], [`Comparison`], [`Operand`] | Truthness of primitive comparison jumps |
//! | [`replacement`] | [`Replaced`] | Heuristics for replaced boolean library calls |
//! | [`sink`] | [`ObservationSink`], [`Target`] | Where observed truthness goes |
//! | `registry` | `BestTruthnessRegistry` | Thread-safe best-per-target sink (requires `std`) |
//! | `observation` | `ObservationBatch` | Serialisable per-target records (requires `serde`) |
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` + `alloc` by default. Enable the `std` feature
//! for the shared registry. Enable `serde` for record and [`Truthness`]
//! serialisation, and `python-ffi` for the PyO3 bindings.
//!
//! ## License
//!
//! Business Source License 1.1. Free for evaluation and non-production use.
//! Commercial production use requires a license from Flout Labs (cbyrne@floutlabs.com).

#![cfg_attr(not(any(feature = "std", feature = "python-ffi", test)), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod error;
pub mod truthness;
pub mod distance;
pub mod value;
pub mod jumps;
pub mod sink;
pub mod replacement;
#[cfg(feature = "std")]
pub mod registry;
#[cfg(feature = "serde")]
pub mod observation;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use distance::{EqualityDistance, StringComparison};
pub use error::{InvalidArgument, Result};
pub use jumps::{Comparison, ComparisonOp, Operand};
pub use replacement::Replaced;
pub use sink::{ObservationSink, Target};
pub use truthness::Truthness;
pub use value::Value;

#[cfg(feature = "std")]
pub use registry::{BestTruthness, BestTruthnessRegistry};
