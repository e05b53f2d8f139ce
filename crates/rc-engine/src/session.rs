//! Per-session concurrency discipline
//!
//! One engine per player session, one writer at a time. A spin is atomic
//! and non-interruptible; a second request while one is in flight is
//! rejected, never interleaved — interleaving would corrupt the round
//! counters.

use parking_lot::Mutex;

use crate::engine::{SessionStats, SlotEngine, SpinEngine};
use crate::error::{EngineError, EngineResult};
use crate::ledger::Ledger;
use crate::spin::{SpinRequest, SpinResult};

/// Shared handle to one session's engine
pub struct Session<L: Ledger> {
    engine: Mutex<SlotEngine<L>>,
}

impl<L: Ledger> Session<L> {
    pub fn new(engine: SlotEngine<L>) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    /// Execute one spin, rejecting the request if another spin for this
    /// session is already running
    pub fn spin(&self, request: &SpinRequest) -> EngineResult<SpinResult> {
        let mut engine = self.engine.try_lock().ok_or(EngineError::SpinInFlight)?;
        engine.spin(request)
    }

    /// Is a bonus round in progress?
    pub fn bonus_active(&self) -> bool {
        self.engine.lock().bonus_active()
    }

    /// Snapshot of the session statistics
    pub fn stats(&self) -> SessionStats {
        self.engine.lock().stats().clone()
    }
}
