//! In-memory activity driver for harness tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use crate::driver::{ActivityDriver, DriverError, RawDiff};
use crate::record::{ActivityKind, ActivityRecord};

/// In-memory stand-in for a host runtime's activity tracking.
///
/// The activity board is mutated explicitly through [`begin_op`](Self::begin_op),
/// [`open_resource`](Self::open_resource), [`start_timer`](Self::start_timer),
/// and friends. Captures store a copy of the board under a name; diffs are
/// equality-based set differences over those copies. Ids are unique per
/// runtime instance, so record equality doubles as the identity key a real
/// runtime would compute.
#[derive(Debug, Default)]
pub struct SimulatedRuntime {
    state: Mutex<Board>,
}

#[derive(Debug, Default)]
struct Board {
    active: Vec<ActivityRecord>,
    snapshots: BTreeMap<String, Vec<ActivityRecord>>,
    next_id: u64,
}

impl Board {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl SimulatedRuntime {
    /// Create a runtime with an empty activity board.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_board<T>(&self, f: impl FnOnce(&mut Board) -> T) -> T {
        let mut board = self
            .state
            .lock()
            .expect("simulated runtime state should not be poisoned");
        f(&mut board)
    }

    /// Start an untraced async op; returns its id.
    pub fn begin_op(&self, op_state: u32) -> u64 {
        self.with_board(|board| {
            let id = board.allocate_id();
            board.active.push(ActivityRecord::AsyncOp(id, op_state, None));
            id
        })
    }

    /// Start an async op carrying a captured stack trace.
    pub fn begin_traced_op(&self, op_state: u32, trace: impl Into<String>) -> u64 {
        let trace = trace.into();
        self.with_board(|board| {
            let id = board.allocate_id();
            board
                .active
                .push(ActivityRecord::AsyncOp(id, op_state, Some(trace)));
            id
        })
    }

    /// Complete a pending async op.
    pub fn complete_op(&self, id: u64) {
        self.with_board(|board| {
            board
                .active
                .retain(|r| !(r.kind() == ActivityKind::AsyncOp && r.id() == id));
        });
    }

    /// Open a resource; returns its id.
    pub fn open_resource(&self) -> u64 {
        self.with_board(|board| {
            let id = board.allocate_id();
            board.active.push(ActivityRecord::Resource(id));
            id
        })
    }

    /// Close an open resource.
    pub fn close_resource(&self, id: u64) {
        self.with_board(|board| {
            board
                .active
                .retain(|r| !(r.kind() == ActivityKind::Resource && r.id() == id));
        });
    }

    /// Arm a one-shot timer; returns its id.
    pub fn start_timer(&self) -> u64 {
        self.with_board(|board| {
            let id = board.allocate_id();
            board.active.push(ActivityRecord::Timer(id));
            id
        })
    }

    /// Arm a repeating interval; returns its id.
    pub fn start_interval(&self) -> u64 {
        self.with_board(|board| {
            let id = board.allocate_id();
            board.active.push(ActivityRecord::Interval(id));
            id
        })
    }

    /// Clear a timer or interval.
    pub fn clear_timer(&self, id: u64) {
        self.with_board(|board| {
            board.active.retain(|r| {
                !(matches!(r.kind(), ActivityKind::Timer | ActivityKind::Interval)
                    && r.id() == id)
            });
        });
    }

    /// Number of currently active records on the board.
    pub fn active_len(&self) -> usize {
        self.with_board(|board| board.active.len())
    }
}

impl ActivityDriver for SimulatedRuntime {
    fn capture(&self, name: &str) -> Result<(), DriverError> {
        self.with_board(|board| {
            if board.snapshots.contains_key(name) {
                return Err(DriverError::DuplicateName(name.to_string()));
            }
            let records = board.active.clone();
            board.snapshots.insert(name.to_string(), records);
            Ok(())
        })
    }

    fn dump(&self, name: &str) -> Result<Vec<ActivityRecord>, DriverError> {
        self.with_board(|board| {
            board
                .snapshots
                .get(name)
                .cloned()
                .ok_or_else(|| DriverError::UnknownSnapshot(name.to_string()))
        })
    }

    fn diff(&self, before: &str, after: &str) -> Result<RawDiff, DriverError> {
        self.with_board(|board| {
            let before_records = board
                .snapshots
                .get(before)
                .ok_or_else(|| DriverError::UnknownSnapshot(before.to_string()))?;
            let after_records = board
                .snapshots
                .get(after)
                .ok_or_else(|| DriverError::UnknownSnapshot(after.to_string()))?;

            let before_set: HashSet<&ActivityRecord> = before_records.iter().collect();
            let after_set: HashSet<&ActivityRecord> = after_records.iter().collect();

            Ok(RawDiff {
                appeared: after_records
                    .iter()
                    .filter(|r| !before_set.contains(*r))
                    .cloned()
                    .collect(),
                disappeared: before_records
                    .iter()
                    .filter(|r| !after_set.contains(*r))
                    .cloned()
                    .collect(),
            })
        })
    }

    fn delete(&self, name: &str) -> Result<(), DriverError> {
        self.with_board(|board| {
            board
                .snapshots
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| DriverError::UnknownSnapshot(name.to_string()))
        })
    }
}
