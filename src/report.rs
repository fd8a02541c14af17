//! Drift report rendering for leak-detection results.

use serde::Serialize;

use crate::collection::ActivityCollection;
use crate::snapshot::SnapshotDiff;

/// Supported output formats for drift reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Plain text for assertion and failure messages.
    Text,
    /// JSON for CI artifacts.
    Json,
}

/// Per-collection count summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    /// Total records.
    pub total: usize,
    /// Pending async ops.
    pub async_ops: usize,
    /// Async ops carrying a stack trace.
    pub traced_ops: usize,
    /// Open resources.
    pub resources: usize,
    /// Live timers and intervals.
    pub timers: usize,
}

impl From<&ActivityCollection> for CollectionSummary {
    fn from(collection: &ActivityCollection) -> Self {
        Self {
            total: collection.len(),
            async_ops: collection.count_ops(),
            traced_ops: collection.count_ops_with_traces(),
            resources: collection.count_resources(),
            timers: collection.count_timers(),
        }
    }
}

/// Serializable summary of a snapshot diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    /// Records that appeared between the snapshots.
    pub appeared: CollectionSummary,
    /// Records that disappeared between the snapshots.
    pub disappeared: CollectionSummary,
    /// True when no drift was observed.
    pub clean: bool,
}

impl From<&SnapshotDiff> for DriftReport {
    fn from(diff: &SnapshotDiff) -> Self {
        Self {
            appeared: diff.appeared().into(),
            disappeared: diff.disappeared().into(),
            clean: diff.is_empty(),
        }
    }
}

fn push_summary(out: &mut String, label: &str, summary: &CollectionSummary) {
    out.push_str(&format!(
        "{label}: {} record(s) ({} async op(s), {} traced, {} resource(s), {} timer(s))\n",
        summary.total, summary.async_ops, summary.traced_ops, summary.resources, summary.timers
    ));
}

/// Render a diff into the requested format.
pub fn render_report(diff: &SnapshotDiff, format: ReportFormat) -> String {
    let report = DriftReport::from(diff);
    match format {
        ReportFormat::Text => {
            let mut out = String::new();
            if report.clean {
                out.push_str("no activity drift\n");
            } else {
                push_summary(&mut out, "appeared", &report.appeared);
                push_summary(&mut out, "disappeared", &report.disappeared);
            }
            out
        }
        ReportFormat::Json => {
            serde_json::to_string_pretty(&report).expect("drift reports should serialize")
        }
    }
}
