//! Cooperative pacing primitives for async harnesses.
//!
//! Thin wrappers over the host runtime's barrier, yield, and spin
//! operations. The spin op never resolves on its own; [`spin_until`]
//! layers external cancellation on top so a watchdog can bound it.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::Barrier;

use crate::driver::DriverError;

/// Contract to the host runtime's cooperative scheduling operations.
///
/// Each async method has a single suspension point.
pub trait SchedulerDriver {
    /// Create a named barrier that releases after `count` awaiters arrive.
    fn barrier_create(&self, name: &str, count: usize) -> Result<(), DriverError>;

    /// Wait on a named barrier.
    ///
    /// Resolves once the barrier's full count of awaiters has arrived;
    /// resolves to true for the single awaiter elected leader.
    fn barrier_await(&self, name: &str) -> impl Future<Output = Result<bool, DriverError>>;

    /// Suspend the calling task for exactly one scheduler turn.
    fn cooperative_yield(&self) -> impl Future<Output = ()>;

    /// Busy-wait on runtime state.
    ///
    /// Never resolves on its own. Pair with [`spin_until`] or terminate
    /// the task from an external watchdog.
    fn spin(&self) -> impl Future<Output = ()>;
}

/// Run the spin op until `cancel` resolves.
///
/// Cancellation is imposed from the outside, so the driver op keeps its
/// never-returning contract while harnesses still get a bounded wait.
pub async fn spin_until<D, C>(driver: &D, cancel: C)
where
    D: SchedulerDriver,
    C: Future<Output = ()>,
{
    tokio::select! {
        _ = driver.spin() => {}
        _ = cancel => {}
    }
}

/// Tokio-backed scheduler driver for harness tests.
#[derive(Debug, Default)]
pub struct SimulatedScheduler {
    barriers: Mutex<BTreeMap<String, Arc<Barrier>>>,
}

impl SimulatedScheduler {
    /// Create a scheduler with no barriers.
    pub fn new() -> Self {
        Self::default()
    }

    fn barriers(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Arc<Barrier>>> {
        self.barriers
            .lock()
            .expect("scheduler barrier table should not be poisoned")
    }
}

impl SchedulerDriver for SimulatedScheduler {
    fn barrier_create(&self, name: &str, count: usize) -> Result<(), DriverError> {
        let mut barriers = self.barriers();
        if barriers.contains_key(name) {
            return Err(DriverError::DuplicateBarrier(name.to_string()));
        }
        barriers.insert(name.to_string(), Arc::new(Barrier::new(count)));
        Ok(())
    }

    fn barrier_await(&self, name: &str) -> impl Future<Output = Result<bool, DriverError>> {
        let barrier = self.barriers().get(name).cloned();
        let name = name.to_string();
        async move {
            match barrier {
                Some(barrier) => Ok(barrier.wait().await.is_leader()),
                None => Err(DriverError::UnknownBarrier(name)),
            }
        }
    }

    fn cooperative_yield(&self) -> impl Future<Output = ()> {
        tokio::task::yield_now()
    }

    fn spin(&self) -> impl Future<Output = ()> {
        std::future::pending()
    }
}
