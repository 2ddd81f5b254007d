//! Double-submit guard: one checkout pipeline per register at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::CheckoutError;

/// Shared flag that is set while a checkout runs.
///
/// Cloning yields a handle to the same gate.
#[derive(Debug, Clone, Default)]
pub struct CheckoutGate {
    busy: Arc<AtomicBool>,
}

impl CheckoutGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the gate, failing fast if a checkout is already running.
    pub fn try_acquire(&self) -> Result<CheckoutPermit, CheckoutError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CheckoutError::InFlight)?;

        Ok(CheckoutPermit {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the length of one pipeline. Dropping it reopens the gate.
#[derive(Debug)]
pub struct CheckoutPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for CheckoutPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
