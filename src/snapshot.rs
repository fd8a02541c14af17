//! Named activity snapshots and snapshot diffs.

use std::sync::Arc;

use thiserror::Error;

use crate::collection::ActivityCollection;
use crate::driver::{ActivityDriver, DriverError};

/// Snapshot lifecycle errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Capture requested under a name that is still live.
    #[error("snapshot name already in use: {0}")]
    DuplicateName(String),
    /// Method called on a disposed snapshot.
    #[error("snapshot used after dispose: {0}")]
    Disposed(String),
    /// Native operation failed.
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),
}

/// A named, point-in-time capture of runtime activity.
///
/// Capturing asks the runtime to record its current activity under a
/// unique name. The records stay on the native side and are materialized
/// on demand via [`dump`](Self::dump). [`dispose`](Self::dispose) releases
/// the native storage; snapshots that were never disposed release it on
/// drop.
pub struct ActivitySnapshot<D: ActivityDriver> {
    driver: Arc<D>,
    name: String,
    disposed: bool,
}

impl<D: ActivityDriver> ActivitySnapshot<D> {
    /// Capture current runtime activity under `name`.
    ///
    /// Fails with [`SnapshotError::DuplicateName`] when `name` is already
    /// live. Captures are single-shot and never overwrite.
    pub fn capture(driver: Arc<D>, name: impl Into<String>) -> Result<Self, SnapshotError> {
        let name = name.into();
        match driver.capture(&name) {
            Ok(()) => Ok(Self {
                driver,
                name,
                disposed: false,
            }),
            Err(DriverError::DuplicateName(name)) => Err(SnapshotError::DuplicateName(name)),
            Err(err) => Err(err.into()),
        }
    }

    /// Name this snapshot is stored under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once [`dispose`](Self::dispose) has released native storage.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub(crate) fn ensure_live(&self) -> Result<(), SnapshotError> {
        if self.disposed {
            Err(SnapshotError::Disposed(self.name.clone()))
        } else {
            Ok(())
        }
    }

    pub(crate) fn driver(&self) -> &Arc<D> {
        &self.driver
    }

    /// Materialize the captured records.
    ///
    /// Does not invalidate the snapshot: repeated dumps return the same
    /// records while the runtime state stored under this name is
    /// unchanged.
    pub fn dump(&self) -> Result<ActivityCollection, SnapshotError> {
        self.ensure_live()?;
        let records = self.driver.dump(&self.name)?;
        Ok(ActivityCollection::from_records(records))
    }

    /// Release the native storage held under this snapshot's name.
    ///
    /// Every later call on this snapshot, including a second `dispose`,
    /// fails with [`SnapshotError::Disposed`].
    pub fn dispose(&mut self) -> Result<(), SnapshotError> {
        self.ensure_live()?;
        self.disposed = true;
        self.driver.delete(&self.name)?;
        Ok(())
    }
}

impl<D: ActivityDriver> Drop for ActivitySnapshot<D> {
    fn drop(&mut self) {
        if !self.disposed {
            // Release path of last resort; a delete error has nowhere to go.
            let _ = self.driver.delete(&self.name);
        }
    }
}

impl<D: ActivityDriver> std::fmt::Debug for ActivitySnapshot<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivitySnapshot")
            .field("name", &self.name)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

/// Appeared/disappeared activity between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDiff {
    appeared: ActivityCollection,
    disappeared: ActivityCollection,
}

impl SnapshotDiff {
    /// Diff two live snapshots captured on the same driver.
    ///
    /// `appeared` holds records present in `after` but not in `before`;
    /// `disappeared` the reverse. Membership uses the runtime's own
    /// per-record identity. The diff runs on the `before` snapshot's
    /// driver, so endpoints captured on different drivers surface as an
    /// unknown-snapshot driver error.
    pub fn between<D: ActivityDriver>(
        before: &ActivitySnapshot<D>,
        after: &ActivitySnapshot<D>,
    ) -> Result<Self, SnapshotError> {
        before.ensure_live()?;
        after.ensure_live()?;
        let raw = before.driver().diff(before.name(), after.name())?;
        Ok(Self {
            appeared: ActivityCollection::from_records(raw.appeared),
            disappeared: ActivityCollection::from_records(raw.disappeared),
        })
    }

    /// Records present after but not before.
    pub fn appeared(&self) -> &ActivityCollection {
        &self.appeared
    }

    /// Records present before but not after.
    pub fn disappeared(&self) -> &ActivityCollection {
        &self.disappeared
    }

    /// True iff nothing appeared and nothing disappeared.
    ///
    /// The primary leak signal: a non-empty `appeared` set after a test
    /// body completes means the test left activity in flight.
    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty() && self.disappeared.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedRuntime;

    fn runtime() -> Arc<SimulatedRuntime> {
        Arc::new(SimulatedRuntime::new())
    }

    #[test]
    fn dump_after_dispose_is_rejected() {
        let runtime = runtime();
        let mut snapshot = ActivitySnapshot::capture(Arc::clone(&runtime), "before")
            .expect("capture should work");
        snapshot.dispose().expect("dispose should work");

        assert!(snapshot.is_disposed());
        assert!(matches!(
            snapshot.dump(),
            Err(SnapshotError::Disposed(name)) if name == "before"
        ));
        assert!(matches!(
            snapshot.dispose(),
            Err(SnapshotError::Disposed(_))
        ));
    }

    #[test]
    fn duplicate_capture_names_are_rejected() {
        let runtime = runtime();
        let _first = ActivitySnapshot::capture(Arc::clone(&runtime), "shared")
            .expect("first capture should work");
        let second = ActivitySnapshot::capture(Arc::clone(&runtime), "shared");

        assert!(matches!(
            second,
            Err(SnapshotError::DuplicateName(name)) if name == "shared"
        ));
    }

    #[test]
    fn drop_releases_the_name() {
        let runtime = runtime();
        {
            let _snapshot = ActivitySnapshot::capture(Arc::clone(&runtime), "scoped")
                .expect("capture should work");
        }
        let again = ActivitySnapshot::capture(Arc::clone(&runtime), "scoped");
        assert!(again.is_ok(), "drop should have released the name");
    }

    #[test]
    fn dispose_releases_the_name_for_reuse() {
        let runtime = runtime();
        let mut snapshot = ActivitySnapshot::capture(Arc::clone(&runtime), "reused")
            .expect("capture should work");
        snapshot.dispose().expect("dispose should work");

        let again = ActivitySnapshot::capture(Arc::clone(&runtime), "reused");
        assert!(again.is_ok(), "dispose should have released the name");
    }

    #[test]
    fn repeated_dumps_are_consistent() {
        let runtime = runtime();
        runtime.begin_op(0);
        runtime.open_resource();
        let snapshot = ActivitySnapshot::capture(Arc::clone(&runtime), "stable")
            .expect("capture should work");

        // Board mutations after capture must not bleed into the snapshot.
        runtime.begin_op(1);

        let first = snapshot.dump().expect("first dump should work");
        let second = snapshot.dump().expect("second dump should work");
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn diff_with_disposed_endpoint_is_rejected() {
        let runtime = runtime();
        let mut before = ActivitySnapshot::capture(Arc::clone(&runtime), "before")
            .expect("capture should work");
        let after = ActivitySnapshot::capture(Arc::clone(&runtime), "after")
            .expect("capture should work");
        before.dispose().expect("dispose should work");

        assert!(matches!(
            SnapshotDiff::between(&before, &after),
            Err(SnapshotError::Disposed(_))
        ));
    }
}
