//! Counting views over captured activity records.

use serde::Serialize;

use crate::record::{ActivityKind, ActivityRecord};

/// Read-only, ordered view over a set of captured activity records.
///
/// Insertion order is preserved for inspection but irrelevant for
/// counting. Collections are owned by the snapshot or diff that produced
/// them and never mutate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityCollection {
    records: Vec<ActivityRecord>,
}

impl ActivityCollection {
    /// Wrap an already-decoded record batch.
    pub fn from_records(records: Vec<ActivityRecord>) -> Self {
        Self { records }
    }

    /// Count records whose category equals `kind`.
    pub fn count_by_kind(&self, kind: ActivityKind) -> usize {
        self.records.iter().filter(|r| r.kind() == kind).count()
    }

    /// Count pending async ops.
    pub fn count_ops(&self) -> usize {
        self.count_by_kind(ActivityKind::AsyncOp)
    }

    /// Count async ops carrying a non-empty stack trace.
    ///
    /// Separates diagnosable leaks from untraceable ones.
    pub fn count_ops_with_traces(&self) -> usize {
        self.records.iter().filter(|r| r.has_trace()).count()
    }

    /// Count open resources.
    pub fn count_resources(&self) -> usize {
        self.count_by_kind(ActivityKind::Resource)
    }

    /// Count live timers and intervals together.
    ///
    /// Both represent recurring wall-clock callbacks, so they are
    /// deliberately conflated here.
    pub fn count_timers(&self) -> usize {
        self.count_by_kind(ActivityKind::Timer) + self.count_by_kind(ActivityKind::Interval)
    }

    /// Number of records in the collection.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True iff the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Underlying record sequence, for advanced inspection.
    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    /// Iterate over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, ActivityRecord> {
        self.records.iter()
    }
}

impl From<Vec<ActivityRecord>> for ActivityCollection {
    fn from(records: Vec<ActivityRecord>) -> Self {
        Self::from_records(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_and_intervals_are_conflated() {
        let collection = ActivityCollection::from_records(vec![
            ActivityRecord::Timer(1),
            ActivityRecord::Timer(2),
            ActivityRecord::Interval(3),
            ActivityRecord::Interval(4),
            ActivityRecord::Interval(5),
        ]);

        assert_eq!(collection.count_timers(), 5);
        assert_eq!(collection.count_by_kind(ActivityKind::Timer), 2);
        assert_eq!(collection.count_by_kind(ActivityKind::Interval), 3);
        assert_eq!(collection.count_ops(), 0);
    }

    #[test]
    fn traced_op_count_requires_non_empty_trace() {
        let collection = ActivityCollection::from_records(vec![
            ActivityRecord::AsyncOp(1, 0, Some("at read".to_string())),
            ActivityRecord::AsyncOp(2, 0, Some("at accept".to_string())),
            ActivityRecord::AsyncOp(3, 0, None),
            ActivityRecord::AsyncOp(4, 1, Some(String::new())),
        ]);

        assert_eq!(collection.count_ops(), 4);
        assert_eq!(collection.count_ops_with_traces(), 2);
    }

    #[test]
    fn empty_collection_counts_nothing() {
        let collection = ActivityCollection::default();
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);
        assert_eq!(collection.count_timers(), 0);
        assert_eq!(collection.count_ops_with_traces(), 0);
    }

    #[test]
    fn records_escape_hatch_preserves_order() {
        let records = vec![
            ActivityRecord::Resource(9),
            ActivityRecord::AsyncOp(1, 0, None),
        ];
        let collection = ActivityCollection::from(records.clone());
        assert_eq!(collection.records(), records.as_slice());
        assert_eq!(collection.iter().count(), 2);
    }
}
