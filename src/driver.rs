//! Native-runtime activity driver contract.

use thiserror::Error;

use crate::record::ActivityRecord;

/// Errors surfaced by native activity and barrier operations.
///
/// None of these are retried: leak detection needs deterministic
/// single-shot captures, so failures propagate straight to the caller.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Capture requested under a name that is still live.
    #[error("snapshot name already in use: {0}")]
    DuplicateName(String),
    /// Dump, diff, or delete referenced a name the runtime does not know.
    #[error("unknown snapshot: {0}")]
    UnknownSnapshot(String),
    /// Barrier created under a name that is still live.
    #[error("barrier name already in use: {0}")]
    DuplicateBarrier(String),
    /// Barrier operation referenced an unknown barrier name.
    #[error("unknown barrier: {0}")]
    UnknownBarrier(String),
    /// The runtime returned activity data this crate could not decode.
    #[error("malformed activity payload: {0}")]
    Malformed(String),
    /// The underlying native call failed.
    #[error("native operation failed: {0}")]
    Failed(String),
}

/// Appeared/disappeared record sets as computed by the runtime.
///
/// Set membership is decided by the runtime's own per-record identity key.
/// This crate does not recompute identity; it trusts the driver result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDiff {
    /// Records present in `after` but not in `before`.
    pub appeared: Vec<ActivityRecord>,
    /// Records present in `before` but not in `after`.
    pub disappeared: Vec<ActivityRecord>,
}

/// Contract to the host runtime's privileged activity tracking.
///
/// All operations are synchronous single calls. A conforming driver must
/// reject `capture` under a live name with [`DriverError::DuplicateName`];
/// silent overwrite would re-base any diff pending against that name.
pub trait ActivityDriver {
    /// Record the current set of active ops, resources, and timers under
    /// `name`.
    fn capture(&self, name: &str) -> Result<(), DriverError>;

    /// Materialize the records stored under `name`.
    fn dump(&self, name: &str) -> Result<Vec<ActivityRecord>, DriverError>;

    /// Compute appeared/disappeared sets between two stored captures.
    fn diff(&self, before: &str, after: &str) -> Result<RawDiff, DriverError>;

    /// Release the storage held under `name`.
    fn delete(&self, name: &str) -> Result<(), DriverError>;
}
