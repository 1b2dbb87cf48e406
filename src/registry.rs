/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Best truthness seen per target, shared across threads.
//!
//! The search only cares whether a target was ever covered, and if not, how
//! close any execution came. The registry therefore keeps, per target id, the
//! largest `of_true` and the largest `of_false` ever reported. The two maxima
//! are tracked independently: once both outcomes of a branch have been
//! observed, both sides read `1.0`.
//!
//! # Invariants
//!
//! - **BR-001**: recorded values never decrease.
//! - **BR-002**: recording order does not change the final state.
//!
//! Requires the `std` feature.

use std::string::{String, ToString};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::vec::Vec;

use hashbrown::HashMap;

use crate::sink::ObservationSink;
use crate::truthness::Truthness;

/// Point-wise best of every truthness reported for one target.
///
/// Unlike [`Truthness`], both sides may be `1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BestTruthness {
    /// Best `of_true` seen.
    pub of_true: f64,
    /// Best `of_false` seen.
    pub of_false: f64,
}

impl BestTruthness {
    /// Fold one observation in. Returns `true` if either side improved.
    pub fn improve(&mut self, t: Truthness) -> bool {
        let improved = t.of_true() > self.of_true || t.of_false() > self.of_false;
        self.of_true = self.of_true.max(t.of_true());
        self.of_false = self.of_false.max(t.of_false());
        improved
    }

    /// The true outcome has been observed.
    pub fn covered_true(&self) -> bool {
        self.of_true == 1.0
    }

    /// The false outcome has been observed.
    pub fn covered_false(&self) -> bool {
        self.of_false == 1.0
    }
}

impl From<Truthness> for BestTruthness {
    fn from(t: Truthness) -> Self {
        Self {
            of_true: t.of_true(),
            of_false: t.of_false(),
        }
    }
}

/// Thread-safe [`ObservationSink`] keeping a [`BestTruthness`] per target.
#[derive(Debug, Default)]
pub struct BestTruthnessRegistry {
    best: Mutex<HashMap<String, BestTruthness>>,
}

impl BestTruthnessRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // The map is updated in place with plain float maxima, so a panic in
    // another holder cannot leave it half-written.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, BestTruthness>> {
        self.best.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Best values for `target_id`, if it was ever reported.
    pub fn get(&self, target_id: &str) -> Option<BestTruthness> {
        self.lock().get(target_id).copied()
    }

    /// Number of distinct targets reported.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing was reported yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget every target.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// All entries, sorted by target id.
    pub fn snapshot(&self) -> Vec<(String, BestTruthness)> {
        let mut entries: Vec<_> = self
            .lock()
            .iter()
            .map(|(id, best)| (id.clone(), *best))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Number of targets whose true outcome was observed.
    pub fn covered_true(&self) -> usize {
        self.lock().values().filter(|b| b.covered_true()).count()
    }

    /// Number of targets whose false outcome was observed.
    pub fn covered_false(&self) -> usize {
        self.lock().values().filter(|b| b.covered_false()).count()
    }
}

impl ObservationSink for BestTruthnessRegistry {
    fn record_observation(&self, target_id: &str, truthness: Truthness) {
        let mut best = self.lock();
        match best.get_mut(target_id) {
            Some(entry) => {
                if entry.improve(truthness) {
                    tracing::trace!(
                        target_id,
                        of_true = entry.of_true,
                        of_false = entry.of_false,
                        "best truthness improved"
                    );
                }
            }
            None => {
                tracing::trace!(target_id, "first observation");
                best.insert(target_id.to_string(), BestTruthness::from(truthness));
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
