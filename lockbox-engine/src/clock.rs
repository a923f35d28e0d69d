//! Clock collaborator - monotonic progress counter for deadlines
//!
//! Deadlines are compared against an externally supplied, monotonically
//! non-decreasing counter, never against wall-clock time. The ledger only
//! reads the counter; it never drives it and never polls it in the
//! background.

use crate::models::ClockValue;
use std::sync::atomic::{AtomicU64, Ordering};

/// Read-only view of the external monotonic counter
pub trait Clock: Send + Sync {
    /// Current counter reading; must never decrease between calls
    fn now(&self) -> ClockValue;
}

/// Manually advanced clock
///
/// Deterministic stand-in for the external counter, advanced explicitly
/// by the harness driving the ledger.
#[derive(Debug, Default)]
pub struct ManualClock {
    ticks: AtomicU64,
}

impl ManualClock {
    pub fn new(start: ClockValue) -> Self {
        Self {
            ticks: AtomicU64::new(start),
        }
    }

    /// Advance the counter by `by` ticks
    pub fn advance(&self, by: ClockValue) {
        self.ticks.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> ClockValue {
        self.ticks.load(Ordering::SeqCst)
    }
}
