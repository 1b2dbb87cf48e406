//! Serializable per-target observation records.
//!
//! An [`ObservationBatch`] is what a test-generation driver ships from the
//! instrumented process back to the search: one [`ObjectiveRecord`] per target
//! with the best scores seen so far. Records carry plain `f64` pairs, so a
//! record built from a registry may hold `1.0` on both sides.
//!
//! # Example
//!
//! ```rust,ignore
//! use truthness_core::observation::ObservationBatch;
//! use truthness_core::registry::BestTruthnessRegistry;
//!
//! let batch = ObservationBatch::from_registry(&registry);
//! let json = serde_json::to_string(&batch).unwrap();
//! let restored: ObservationBatch = serde_json::from_str(&json).unwrap();
//! ```
//!
//! Requires the `serde` feature; [`ObservationBatch::from_registry`] also
//! requires `std`.

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "std")]
use crate::registry::{BestTruthness, BestTruthnessRegistry};
use crate::truthness::Truthness;

/// Current batch format version.
pub const OBSERVATION_BATCH_VERSION: u16 = 1;

/// Scores for a single target.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct ObjectiveRecord {
    /// Identifier of the instrumented target.
    pub target_id: String,
    /// Best closeness to the true outcome.
    pub of_true: f64,
    /// Best closeness to the false outcome.
    pub of_false: f64,
}

impl ObjectiveRecord {
    /// Record of a single observation.
    pub fn new(target_id: impl Into<String>, truthness: Truthness) -> Self {
        Self {
            target_id: target_id.into(),
            of_true: truthness.of_true(),
            of_false: truthness.of_false(),
        }
    }
}

#[cfg(feature = "std")]
impl From<(String, BestTruthness)> for ObjectiveRecord {
    fn from((target_id, best): (String, BestTruthness)) -> Self {
        Self {
            target_id,
            of_true: best.of_true,
            of_false: best.of_false,
        }
    }
}

/// A versioned set of [`ObjectiveRecord`]s.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct ObservationBatch {
    /// Always [`OBSERVATION_BATCH_VERSION`] for newly created batches.
    pub version: u16,
    /// Records, sorted by target id when built from a registry.
    pub records: Vec<ObjectiveRecord>,
}

impl Default for ObservationBatch {
    fn default() -> Self {
        Self {
            version: OBSERVATION_BATCH_VERSION,
            records: Vec::new(),
        }
    }
}

impl ObservationBatch {
    /// Capture every target currently held by `registry`.
    #[cfg(feature = "std")]
    pub fn from_registry(registry: &BestTruthnessRegistry) -> Self {
        Self {
            version: OBSERVATION_BATCH_VERSION,
            records: registry.snapshot().into_iter().map(ObjectiveRecord::from).collect(),
        }
    }

    /// Append a record.
    pub fn push(&mut self, record: ObjectiveRecord) {
        self.records.push(record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the batch holds no record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by target id.
    pub fn find(&self, target_id: &str) -> Option<&ObjectiveRecord> {
        self.records.iter().find(|r| r.target_id == target_id)
    }
}
