//! Proptest strategies for activity records.

use proptest::prelude::*;

use crate::record::{ActivityKind, ActivityRecord};

/// Generate an arbitrary activity category.
pub fn activity_kind() -> impl Strategy<Value = ActivityKind> {
    prop_oneof![
        Just(ActivityKind::AsyncOp),
        Just(ActivityKind::Resource),
        Just(ActivityKind::Timer),
        Just(ActivityKind::Interval),
    ]
}

/// Generate an async-op record with an optional non-empty trace.
pub fn async_op_record() -> impl Strategy<Value = ActivityRecord> {
    (
        any::<u64>(),
        any::<u32>(),
        proptest::option::of("[a-z ]{1,32}"),
    )
        .prop_map(|(id, state, trace)| ActivityRecord::AsyncOp(id, state, trace))
}

/// Generate a record of any category.
pub fn activity_record() -> impl Strategy<Value = ActivityRecord> {
    prop_oneof![
        async_op_record(),
        any::<u64>().prop_map(ActivityRecord::Resource),
        any::<u64>().prop_map(ActivityRecord::Timer),
        any::<u64>().prop_map(ActivityRecord::Interval),
    ]
}

/// Generate a batch of up to `max` records.
pub fn record_batch(max: usize) -> impl Strategy<Value = Vec<ActivityRecord>> {
    proptest::collection::vec(activity_record(), 0..=max)
}
