//! Snapshot naming and capture/diff orchestration.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::driver::ActivityDriver;
use crate::snapshot::{ActivitySnapshot, SnapshotDiff, SnapshotError};

/// Allocates sequential snapshot names and orchestrates capture and diff.
///
/// The sequence counter is owned by the registry instance, so independent
/// registries hand out independent `snapshot-<n>` sequences. The counter
/// starts at 0, only ever increments, and is never persisted.
pub struct SnapshotRegistry<D: ActivityDriver> {
    driver: Arc<D>,
    sequence: AtomicU64,
}

impl<D: ActivityDriver> SnapshotRegistry<D> {
    /// Create a registry over `driver`.
    pub fn new(driver: Arc<D>) -> Self {
        Self {
            driver,
            sequence: AtomicU64::new(0),
        }
    }

    /// Capture under the next sequential name (`snapshot-0`, `snapshot-1`, ...).
    pub fn capture(&self) -> Result<ActivitySnapshot<D>, SnapshotError> {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        ActivitySnapshot::capture(Arc::clone(&self.driver), format!("snapshot-{seq}"))
    }

    /// Capture under an explicit caller-managed name.
    pub fn capture_named(
        &self,
        name: impl Into<String>,
    ) -> Result<ActivitySnapshot<D>, SnapshotError> {
        ActivitySnapshot::capture(Arc::clone(&self.driver), name)
    }

    /// Diff two snapshots taken from this registry's driver.
    pub fn diff(
        &self,
        before: &ActivitySnapshot<D>,
        after: &ActivitySnapshot<D>,
    ) -> Result<SnapshotDiff, SnapshotError> {
        SnapshotDiff::between(before, after)
    }

    /// Shared handle to the underlying driver.
    pub fn driver(&self) -> Arc<D> {
        Arc::clone(&self.driver)
    }
}

impl<D: ActivityDriver> std::fmt::Debug for SnapshotRegistry<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotRegistry")
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedRuntime;

    #[test]
    fn names_are_sequential_per_registry() {
        let runtime = Arc::new(SimulatedRuntime::new());
        let registry = SnapshotRegistry::new(Arc::clone(&runtime));

        let a = registry.capture().expect("first capture should work");
        let b = registry.capture().expect("second capture should work");
        let c = registry.capture().expect("third capture should work");

        assert_eq!(a.name(), "snapshot-0");
        assert_eq!(b.name(), "snapshot-1");
        assert_eq!(c.name(), "snapshot-2");
    }

    #[test]
    fn independent_registries_do_not_share_sequences() {
        let registry_a = SnapshotRegistry::new(Arc::new(SimulatedRuntime::new()));
        let registry_b = SnapshotRegistry::new(Arc::new(SimulatedRuntime::new()));

        let a = registry_a.capture().expect("capture should work");
        let b = registry_b.capture().expect("capture should work");

        assert_eq!(a.name(), "snapshot-0");
        assert_eq!(b.name(), "snapshot-0");
    }

    #[test]
    fn explicit_names_still_reject_duplicates() {
        let registry = SnapshotRegistry::new(Arc::new(SimulatedRuntime::new()));
        let _held = registry
            .capture_named("boundary")
            .expect("first capture should work");

        assert!(matches!(
            registry.capture_named("boundary"),
            Err(SnapshotError::DuplicateName(_))
        ));
    }

    #[test]
    fn diff_runs_through_the_registry_driver() {
        let runtime = Arc::new(SimulatedRuntime::new());
        let registry = SnapshotRegistry::new(Arc::clone(&runtime));

        let before = registry.capture().expect("before capture should work");
        runtime.begin_op(0);
        let after = registry.capture().expect("after capture should work");

        let diff = registry.diff(&before, &after).expect("diff should work");
        assert_eq!(diff.appeared().len(), 1);
        assert!(diff.disappeared().is_empty());
    }
}
