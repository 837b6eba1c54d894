use std::cell::Cell;
use std::rc::Rc;

/// Source of wall-clock time in epoch milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Production clock backed by the system time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // clamp pre-epoch clocks to zero rather than wrapping
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Manually advanced clock for simulated time. Clones share the same instant.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
