//! Pure timing state machine. Time is always passed in, never read here.

use std::time::Duration;
use tracing::debug;

/// Display refresh period while running
pub const TICK_INTERVAL_MS: u64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerStatus {
    Idle,
    Running,
    Stopped,
}

/// Identifies one armed run of the periodic tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickHandle(u64);

/// Cancellable periodic tick owned by the timer
#[derive(Debug)]
pub struct TickSchedule {
    interval: Duration,
    armed: Option<TickHandle>,
    next_generation: u64,
}

impl TickSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            armed: None,
            next_generation: 0,
        }
    }

    fn arm(&mut self) -> TickHandle {
        let handle = TickHandle(self.next_generation);
        self.next_generation += 1;
        self.armed = Some(handle);
        handle
    }

    fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_live(&self, handle: TickHandle) -> bool {
        self.armed == Some(handle)
    }

    pub fn current(&self) -> Option<TickHandle> {
        self.armed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[derive(Debug)]
pub struct Timer {
    status: TimerStatus,
    origin_ms: Option<u64>,
    accumulated_ms: u64,
    schedule: TickSchedule,
}

impl Timer {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            status: TimerStatus::Idle,
            origin_ms: None,
            accumulated_ms: 0,
            schedule: TickSchedule::new(tick_interval),
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    pub fn origin_ms(&self) -> Option<u64> {
        self.origin_ms
    }

    pub fn schedule(&self) -> &TickSchedule {
        &self.schedule
    }

    /// Begin ticking. Resumes from any accumulated value not yet reset.
    /// Returns false when already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.is_running() {
            return false;
        }
        self.origin_ms = Some(now_ms.saturating_sub(self.accumulated_ms));
        self.status = TimerStatus::Running;
        let handle = self.schedule.arm();
        debug!(?handle, origin_ms = ?self.origin_ms, "timer started");
        true
    }

    /// Freeze the elapsed time. Returns the frozen value, or None when not running.
    pub fn stop(&mut self, now_ms: u64) -> Option<u64> {
        if !self.is_running() {
            return None;
        }
        self.schedule.cancel();
        self.accumulated_ms = self.elapsed_ms(now_ms);
        self.status = TimerStatus::Stopped;
        debug!(accumulated_ms = self.accumulated_ms, "timer stopped");
        Some(self.accumulated_ms)
    }

    pub fn reset(&mut self) {
        self.schedule.cancel();
        self.accumulated_ms = 0;
        self.origin_ms = None;
        self.status = TimerStatus::Idle;
        debug!("timer reset");
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match (self.status, self.origin_ms) {
            (TimerStatus::Running, Some(origin)) => now_ms.saturating_sub(origin),
            _ => self.accumulated_ms,
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_INTERVAL_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_idle() {
        let timer = Timer::default();
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.accumulated_ms(), 0);
        assert_eq!(timer.origin_ms(), None);
        assert_eq!(timer.schedule().current(), None);
        assert_eq!(timer.schedule().interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_start_stop_elapsed() {
        let mut timer = Timer::default();
        assert!(timer.start(1_000));
        assert_eq!(timer.elapsed_ms(1_500), 500);

        assert_eq!(timer.stop(2_050), Some(1_050));
        assert_eq!(timer.status(), TimerStatus::Stopped);
        assert_eq!(timer.elapsed_ms(9_000), 1_050);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut timer = Timer::default();
        timer.start(100);
        let handle = timer.schedule().current();

        assert!(!timer.start(500));
        assert_eq!(timer.origin_ms(), Some(100));
        assert_eq!(timer.schedule().current(), handle);
    }

    #[test]
    fn test_stop_twice_is_idempotent() {
        let mut timer = Timer::default();
        timer.start(0);
        assert_eq!(timer.stop(700), Some(700));
        assert_eq!(timer.stop(900), None);
        assert_eq!(timer.accumulated_ms(), 700);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut timer = Timer::default();
        assert_eq!(timer.stop(100), None);
        assert_eq!(timer.status(), TimerStatus::Idle);
    }

    #[test]
    fn test_restart_without_reset_resumes() {
        let mut timer = Timer::default();
        timer.start(0);
        timer.stop(400);
        timer.start(1_000);
        assert_eq!(timer.origin_ms(), Some(600));
        assert_eq!(timer.elapsed_ms(1_100), 500);
    }

    #[test]
    fn test_reset_clears_and_cancels() {
        let mut timer = Timer::default();
        timer.start(0);
        let handle = timer.schedule().current().unwrap();

        timer.reset();
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.accumulated_ms(), 0);
        assert!(!timer.schedule().is_live(handle));
    }

    #[test]
    fn test_each_start_arms_a_fresh_handle() {
        let mut timer = Timer::default();
        timer.start(0);
        let first = timer.schedule().current().unwrap();
        timer.stop(10);
        assert!(!timer.schedule().is_live(first));

        timer.reset();
        timer.start(20);
        let second = timer.schedule().current().unwrap();
        assert_ne!(first, second);
        assert!(timer.schedule().is_live(second));
        assert!(!timer.schedule().is_live(first));
    }

    #[test]
    fn test_clock_going_backwards_saturates() {
        let mut timer = Timer::default();
        timer.start(1_000);
        assert_eq!(timer.elapsed_ms(500), 0);
        assert_eq!(timer.stop(500), Some(0));
    }
}
