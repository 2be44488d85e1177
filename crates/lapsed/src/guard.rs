//! At-most-one-cycle admission control.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Binary permit serializing capture cycles.
///
/// Admission never waits: a caller that cannot take the permit skips its
/// cycle entirely. Overlap is therefore bounded at zero concurrent cycles,
/// at the cost of silently dropping a tick when the previous cycle is
/// still running.
#[derive(Clone)]
pub struct CycleGuard {
    permit: Arc<Semaphore>,
}

/// Held for the duration of one cycle. Dropping it releases the guard, so
/// release happens on every exit path.
pub struct CyclePermit {
    _permit: OwnedSemaphorePermit,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self {
            permit: Arc::new(Semaphore::new(1)),
        }
    }

    /// Non-blocking admission. `None` means a cycle is already running.
    pub fn try_enter(&self) -> Option<CyclePermit> {
        self.permit
            .clone()
            .try_acquire_owned()
            .ok()
            .map(|permit| CyclePermit { _permit: permit })
    }
}

impl Default for CycleGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_entry_is_refused() {
        let guard = CycleGuard::new();
        let first = guard.try_enter();
        assert!(first.is_some());
        assert!(guard.try_enter().is_none());
    }

    #[test]
    fn test_release_readmits() {
        let guard = CycleGuard::new();
        let permit = guard.try_enter().unwrap();
        drop(permit);
        assert!(guard.try_enter().is_some());
    }

    #[test]
    fn test_clones_share_the_permit() {
        let guard = CycleGuard::new();
        let other = guard.clone();
        let _held = guard.try_enter().unwrap();
        assert!(other.try_enter().is_none());
    }
}
