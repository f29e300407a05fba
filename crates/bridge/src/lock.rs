use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Non-blocking mutual-exclusion gate guarding "a recording is in progress".
///
/// Scoped to one bridge session: multiple sessions in a process hold
/// independent locks. Clones share the same gate, so `try_acquire` can be
/// called without any coordination on the caller's side.
#[derive(Clone, Debug, Default)]
pub struct StatusLock {
    held: Arc<AtomicBool>,
}

/// Exclusive ownership of the single recording slot.
///
/// At most one live token exists per lock. Released explicitly; dropping a
/// token without releasing keeps the slot occupied, which matches teardown
/// semantics (no in-flight admission is forcibly revoked).
#[derive(Debug)]
pub struct AdmissionToken {
    held: Arc<AtomicBool>,
}

impl StatusLock {
    pub fn new() -> Self {
        StatusLock::default()
    }

    /// Acquire the slot iff it is currently free. Never blocks.
    pub fn try_acquire(&self) -> Option<AdmissionToken> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then(|| AdmissionToken {
                held: self.held.clone(),
            })
    }

    /// Free the slot. Idempotent: releasing an already-free lock is a no-op,
    /// since a worker-reported stop may race teardown.
    pub fn release(&self) {
        self.held.store(false, Ordering::Release);
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

impl AdmissionToken {
    /// Consume the token and free the slot.
    pub fn release(self) {
        self.held.store(false, Ordering::Release);
    }
}
