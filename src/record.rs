//! Typed runtime-activity records.

use serde::{Deserialize, Serialize};

/// Category tag for one activity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActivityKind {
    /// Pending asynchronous operation.
    AsyncOp,
    /// Open resource.
    Resource,
    /// Live one-shot timer.
    Timer,
    /// Live repeating interval.
    Interval,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::AsyncOp => "async op",
            Self::Resource => "resource",
            Self::Timer => "timer",
            Self::Interval => "interval",
        };
        f.write_str(label)
    }
}

/// One in-flight activity observed by the host runtime at capture time.
///
/// The serialized form matches the runtime's wire shape: an externally
/// tagged variant with a tuple payload, e.g. `{"AsyncOp":[7,0,"trace text"]}`
/// or `{"Timer":3}`. Records are decoded once at the boundary and are
/// immutable values afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityRecord {
    /// Pending async op: operation id, numeric op state, optional captured
    /// stack trace.
    AsyncOp(u64, u32, Option<String>),
    /// Open resource id.
    Resource(u64),
    /// Live one-shot timer id.
    Timer(u64),
    /// Live repeating interval id.
    Interval(u64),
}

impl ActivityRecord {
    /// Category tag of this record.
    pub fn kind(&self) -> ActivityKind {
        match self {
            Self::AsyncOp(..) => ActivityKind::AsyncOp,
            Self::Resource(..) => ActivityKind::Resource,
            Self::Timer(..) => ActivityKind::Timer,
            Self::Interval(..) => ActivityKind::Interval,
        }
    }

    /// Runtime-assigned identifier.
    pub fn id(&self) -> u64 {
        match self {
            Self::AsyncOp(id, _, _)
            | Self::Resource(id)
            | Self::Timer(id)
            | Self::Interval(id) => *id,
        }
    }

    /// Captured stack trace, when this is a traced async op.
    pub fn trace(&self) -> Option<&str> {
        match self {
            Self::AsyncOp(_, _, trace) => trace.as_deref(),
            _ => None,
        }
    }

    /// True for async ops carrying a non-empty trace.
    pub fn has_trace(&self) -> bool {
        self.trace().is_some_and(|trace| !trace.is_empty())
    }
}

/// Decode a batch of records from the runtime's serialized activity dump.
pub fn decode_records(payload: &str) -> Result<Vec<ActivityRecord>, serde_json::Error> {
    serde_json::from_str(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_decodes_to_tagged_variants() {
        let records = decode_records(
            r#"[{"AsyncOp":[7,0,"at poll_fn"]},{"AsyncOp":[8,1,null]},{"Resource":2},{"Timer":3},{"Interval":4}]"#,
        )
        .expect("activity dump should decode");

        assert_eq!(records.len(), 5);
        assert_eq!(
            records[0],
            ActivityRecord::AsyncOp(7, 0, Some("at poll_fn".to_string()))
        );
        assert_eq!(records[1], ActivityRecord::AsyncOp(8, 1, None));
        assert_eq!(records[2].kind(), ActivityKind::Resource);
        assert_eq!(records[3].id(), 3);
        assert_eq!(records[4].kind(), ActivityKind::Interval);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(decode_records(r#"[{"AsyncOp":"not a tuple"}]"#).is_err());
        assert!(decode_records("{not json").is_err());
    }

    #[test]
    fn empty_trace_does_not_count_as_traced() {
        let traced = ActivityRecord::AsyncOp(1, 0, Some("at spawn".to_string()));
        let blank = ActivityRecord::AsyncOp(2, 0, Some(String::new()));
        let untraced = ActivityRecord::AsyncOp(3, 0, None);

        assert!(traced.has_trace());
        assert!(!blank.has_trace());
        assert!(!untraced.has_trace());
        assert!(!ActivityRecord::Timer(4).has_trace());
    }
}
