//! Single-slot exclusion gate serializing reply collection
//!
//! The operator presents a single modal terminal surface, so only one
//! request may drive a reply source at a time. The gate is owned by the
//! server state rather than being process-global, so independent server
//! instances can coexist in one process.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Non-blocking, single-slot mutual exclusion.
///
/// `try_acquire` never waits or queues: while a [`RequestPermit`] is alive,
/// every further attempt fails immediately and the caller must reject the
/// request.
#[derive(Clone)]
pub struct RequestGate {
    slot: Arc<Semaphore>,
}

/// RAII permit for the gate; released on drop on every exit path.
pub struct RequestPermit {
    _permit: OwnedSemaphorePermit,
}

impl RequestGate {
    pub fn new() -> Self {
        RequestGate {
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Try to take the single slot without waiting.
    pub fn try_acquire(&self) -> Option<RequestPermit> {
        self.slot
            .clone()
            .try_acquire_owned()
            .ok()
            .map(|permit| RequestPermit { _permit: permit })
    }
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let gate = RequestGate::new();

        let permit = gate.try_acquire();
        assert!(permit.is_some());
        assert!(gate.try_acquire().is_none());

        drop(permit);
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn test_clones_share_the_slot() {
        let gate = RequestGate::new();
        let other = gate.clone();

        let _permit = gate.try_acquire().unwrap();
        assert!(other.try_acquire().is_none());
    }

    #[test]
    fn test_independent_gates_do_not_interfere() {
        let a = RequestGate::new();
        let b = RequestGate::new();

        let _permit = a.try_acquire().unwrap();
        assert!(b.try_acquire().is_some());
    }
}
