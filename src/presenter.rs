use crate::history::RankedSolve;

/// Cosmetic state hint for the display
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Feedback {
    Idle,
    Running,
    Stopped,
}

/// Presentation boundary: receives already formatted state, never drives it
pub trait Presenter {
    fn render_elapsed(&mut self, elapsed: &str);
    fn render_scramble(&mut self, scramble: &str);
    fn render_history(&mut self, entries: &[RankedSolve]);
    fn set_visual_feedback(&mut self, _feedback: Feedback) {}
}

/// Presenter that records every call, for tests and headless runs
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    pub elapsed: Vec<String>,
    pub scrambles: Vec<String>,
    pub histories: Vec<Vec<String>>,
    pub feedback: Vec<Feedback>,
}

impl RecordingPresenter {
    pub fn last_elapsed(&self) -> Option<&str> {
        self.elapsed.last().map(String::as_str)
    }

    pub fn last_scramble(&self) -> Option<&str> {
        self.scrambles.last().map(String::as_str)
    }

    pub fn last_history(&self) -> Option<&[String]> {
        self.histories.last().map(Vec::as_slice)
    }

    pub fn last_feedback(&self) -> Option<Feedback> {
        self.feedback.last().copied()
    }
}

impl Presenter for RecordingPresenter {
    fn render_elapsed(&mut self, elapsed: &str) {
        self.elapsed.push(elapsed.to_string());
    }

    fn render_scramble(&mut self, scramble: &str) {
        self.scrambles.push(scramble.to_string());
    }

    fn render_history(&mut self, entries: &[RankedSolve]) {
        self.histories
            .push(entries.iter().map(|e| e.to_string()).collect());
    }

    fn set_visual_feedback(&mut self, feedback: Feedback) {
        self.feedback.push(feedback);
    }
}
