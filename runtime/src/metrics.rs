//! Metric descriptions for the Store.
//!
//! The Store records through the `metrics` facade, which is a no-op until a
//! recorder is installed. Call [`register_metrics`] once after installing a
//! recorder so exporters can show units and help text.

use metrics::{Unit, describe_counter, describe_histogram};

// Re-export metrics macros for use in other crates
pub use metrics::{counter, histogram};

/// Describe every metric the Store emits
pub fn register_metrics() {
    describe_counter!(
        "store.commands.total",
        Unit::Count,
        "Actions sent to a store"
    );
    describe_counter!(
        "store.effects.executed",
        Unit::Count,
        "Effects executed, labelled by effect type"
    );
    describe_histogram!(
        "store.reducer.duration_seconds",
        Unit::Seconds,
        "Time spent inside a reducer"
    );
    describe_counter!(
        "store.wait.timeout",
        Unit::Count,
        "send_and_wait_for calls that gave up before a result arrived"
    );
    describe_counter!(
        "store.shutdown.initiated",
        Unit::Count,
        "Graceful shutdowns started"
    );
    describe_counter!(
        "store.shutdown.completed",
        Unit::Count,
        "Graceful shutdowns that drained every effect"
    );
    describe_counter!(
        "store.shutdown.timeout",
        Unit::Count,
        "Graceful shutdowns that gave up with effects still running"
    );
    describe_counter!(
        "store.shutdown.rejected_actions",
        Unit::Count,
        "Actions rejected because the store was shutting down"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registering_without_recorder_is_harmless() {
        register_metrics();
        register_metrics();
    }
}
