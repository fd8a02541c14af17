//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used items from this crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use leakcheck::prelude::*;
//! ```

// Re-export proptest
pub use proptest::prelude::*;

pub use crate::collection::ActivityCollection;
pub use crate::driver::{ActivityDriver, DriverError, RawDiff};
pub use crate::generators::{activity_kind, activity_record, async_op_record, record_batch};
pub use crate::record::{ActivityKind, ActivityRecord, decode_records};
pub use crate::registry::SnapshotRegistry;
pub use crate::report::{CollectionSummary, DriftReport, ReportFormat, render_report};
pub use crate::sim::SimulatedRuntime;
pub use crate::snapshot::{ActivitySnapshot, SnapshotDiff, SnapshotError};

#[cfg(feature = "pacing")]
#[cfg_attr(docsrs, doc(cfg(feature = "pacing")))]
pub use crate::pacing::{SchedulerDriver, SimulatedScheduler, spin_until};
