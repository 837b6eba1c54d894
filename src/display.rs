use std::time::{Duration, Instant};

use crate::history::RankedSolve;
use crate::presenter::{Feedback, Presenter};

/// How long the stopped colour stays before fading back to neutral
pub const STOP_FLASH: Duration = Duration::from_millis(300);

/// Latest state handed over by the session, ready for drawing
#[derive(Debug, Clone)]
pub struct TerminalDisplay {
    pub elapsed: String,
    pub scramble: String,
    pub history: Vec<String>,
    feedback: Feedback,
    feedback_at: Instant,
    dirty: bool,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            elapsed: String::new(),
            scramble: String::new(),
            history: vec![],
            feedback: Feedback::Idle,
            feedback_at: Instant::now(),
            dirty: true,
        }
    }

    /// Feedback to draw at `now`; a stop flash decays to idle
    pub fn feedback_at(&self, now: Instant) -> Feedback {
        match self.feedback {
            Feedback::Stopped if now.duration_since(self.feedback_at) > STOP_FLASH => {
                Feedback::Idle
            }
            f => f,
        }
    }

    /// Whether the drawn feedback will still change without new input
    pub fn is_flashing(&self, now: Instant) -> bool {
        self.feedback == Feedback::Stopped
            && now.duration_since(self.feedback_at) <= STOP_FLASH
    }

    /// Time left until a stop flash fades, or `None` when nothing is fading
    pub fn flash_remaining(&self, now: Instant) -> Option<Duration> {
        if !self.is_flashing(now) {
            return None;
        }
        let shown = now.duration_since(self.feedback_at);
        // land just past the edge so the redraw sees the faded colour
        Some(STOP_FLASH.saturating_sub(shown) + Duration::from_millis(1))
    }

    /// Returns whether anything changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for TerminalDisplay {
    fn render_elapsed(&mut self, elapsed: &str) {
        if self.elapsed != elapsed {
            self.elapsed = elapsed.to_string();
            self.dirty = true;
        }
    }

    fn render_scramble(&mut self, scramble: &str) {
        self.scramble = scramble.to_string();
        self.dirty = true;
    }

    fn render_history(&mut self, entries: &[RankedSolve]) {
        self.history = entries.iter().map(|e| e.to_string()).collect();
        self.dirty = true;
    }

    fn set_visual_feedback(&mut self, feedback: Feedback) {
        self.feedback = feedback;
        self.feedback_at = Instant::now();
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_flash_decays() {
        let mut display = TerminalDisplay::new();
        display.set_visual_feedback(Feedback::Stopped);
        let set_at = Instant::now();

        assert_eq!(display.feedback_at(set_at), Feedback::Stopped);
        let later = set_at + STOP_FLASH + Duration::from_millis(50);
        assert_eq!(display.feedback_at(later), Feedback::Idle);
        assert!(!display.is_flashing(later));
    }

    #[test]
    fn test_flash_remaining_counts_down() {
        let mut display = TerminalDisplay::new();
        assert_eq!(display.flash_remaining(Instant::now()), None);

        display.set_visual_feedback(Feedback::Stopped);
        let set_at = Instant::now();
        let remaining = display.flash_remaining(set_at).unwrap();
        assert!(remaining <= STOP_FLASH + Duration::from_millis(1));
        assert!(remaining > Duration::ZERO);

        // waking after the reported wait finds the flash gone
        assert!(!display.is_flashing(set_at + remaining));
        assert_eq!(display.flash_remaining(set_at + remaining), None);
    }

    #[test]
    fn test_running_does_not_decay() {
        let mut display = TerminalDisplay::new();
        display.set_visual_feedback(Feedback::Running);
        let later = Instant::now() + Duration::from_secs(10);
        assert_eq!(display.feedback_at(later), Feedback::Running);
        assert!(!display.is_flashing(later));
    }

    #[test]
    fn test_dirty_tracking() {
        let mut display = TerminalDisplay::new();
        assert!(display.take_dirty());
        assert!(!display.take_dirty());

        display.render_elapsed("0.00");
        assert!(display.take_dirty());

        display.render_elapsed("0.00");
        assert!(!display.take_dirty());

        display.render_history(&[RankedSolve {
            rank: 1,
            duration_ms: 900,
            time: "0.90".into(),
        }]);
        assert!(display.take_dirty());
        assert_eq!(display.history, vec!["1. 0.90"]);
    }
}
