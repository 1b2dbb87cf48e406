//! Where observed truthness values go.
//!
//! The replacement heuristics compute a [`Truthness`] for every call they
//! intercept. When the call site carries a [`Target`], the value is reported
//! to the target's sink, which typically keeps the best value seen per target
//! (see `BestTruthnessRegistry` with the `std` feature).

use crate::truthness::Truthness;

/// Receives one truthness per evaluated target.
///
/// Implementations must tolerate concurrent calls from the instrumented
/// program's threads, hence `&self`.
pub trait ObservationSink {
    /// Record that `target_id` was just evaluated with `truthness`.
    fn record_observation(&self, target_id: &str, truthness: Truthness);
}

/// An instrumentation target: its identifier and the sink it reports to.
#[derive(Clone, Copy)]
pub struct Target<'a> {
    id: &'a str,
    sink: &'a dyn ObservationSink,
}

impl<'a> Target<'a> {
    /// A target reporting to `sink` under `id`.
    pub fn new(id: &'a str, sink: &'a dyn ObservationSink) -> Self {
        Self { id, sink }
    }

    /// The target identifier.
    pub fn id(&self) -> &'a str {
        self.id
    }

    pub(crate) fn record(&self, truthness: Truthness) {
        tracing::trace!(
            target_id = self.id,
            of_true = truthness.of_true(),
            of_false = truthness.of_false(),
            "truthness observed"
        );
        self.sink.record_observation(self.id, truthness);
    }
}

impl core::fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Target").field("id", &self.id).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;

    #[derive(Default)]
    struct Recording(RefCell<Vec<(String, Truthness)>>);

    impl ObservationSink for Recording {
        fn record_observation(&self, target_id: &str, truthness: Truthness) {
            self.0.borrow_mut().push((target_id.to_string(), truthness));
        }
    }

    #[test]
    fn test_target_forwards_to_sink() {
        let sink = Recording::default();
        let target = Target::new("Foo_line_12_branch_0", &sink);
        target.record(Truthness::TRUE);
        target.record(Truthness::when_false(0.5));

        let seen = sink.0.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "Foo_line_12_branch_0");
        assert_eq!(seen[1].1.of_true(), 0.5);
        assert_eq!(target.id(), "Foo_line_12_branch_0");
    }
}
