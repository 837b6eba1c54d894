use std::time::Duration;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::history::{SessionHistory, SolveRecord};
use crate::input::Intent;
use crate::presenter::{Feedback, Presenter};
use crate::scramble::{Scramble, ScrambleGenerator, DEFAULT_SCRAMBLE_LENGTH};
use crate::time_format::format_duration;
use crate::timer::{TickHandle, Timer, TimerStatus, TICK_INTERVAL_MS};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub scramble_length: usize,
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scramble_length: DEFAULT_SCRAMBLE_LENGTH,
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
        }
    }
}

/// Owns everything a practice session needs: the timer, the active
/// scramble, the solves so far and the presenter reflecting them.
#[derive(Debug)]
pub struct TimerSession<P: Presenter, C: Clock> {
    config: SessionConfig,
    timer: Timer,
    history: SessionHistory,
    scramble: Scramble,
    generator: ScrambleGenerator,
    clock: C,
    presenter: P,
}

impl<P: Presenter, C: Clock> TimerSession<P, C> {
    pub fn new(
        config: SessionConfig,
        generator: ScrambleGenerator,
        clock: C,
        presenter: P,
    ) -> Self {
        let mut session = Self {
            timer: Timer::new(config.tick_interval),
            config,
            history: SessionHistory::new(),
            scramble: Scramble::default(),
            generator,
            clock,
            presenter,
        };
        session.presenter.render_elapsed(&format_duration(0));
        session.presenter.set_visual_feedback(Feedback::Idle);
        session.generate_scramble();
        session.render_history();
        session
    }

    pub fn status(&self) -> TimerStatus {
        self.timer.status()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn accumulated_ms(&self) -> u64 {
        self.timer.accumulated_ms()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.timer.elapsed_ms(self.clock.now_ms())
    }

    pub fn scramble(&self) -> &Scramble {
        &self.scramble
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Handle for the pending periodic tick, present only while running
    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.timer.schedule().current()
    }

    pub fn tick_interval(&self) -> Duration {
        self.timer.schedule().interval()
    }

    pub fn start(&mut self) {
        if self.timer.start(self.clock.now_ms()) {
            self.presenter.set_visual_feedback(Feedback::Running);
            self.render_elapsed();
        }
    }

    pub fn stop(&mut self) {
        let Some(frozen) = self.timer.stop(self.clock.now_ms()) else {
            return;
        };

        self.presenter.render_elapsed(&format_duration(frozen));
        self.presenter.set_visual_feedback(Feedback::Stopped);

        if frozen > 0 {
            info!(duration_ms = frozen, scramble = %self.scramble, "solve recorded");
            self.history
                .append(SolveRecord::new(frozen, self.scramble.clone()));
            self.render_history();
        }
    }

    /// Clear the live timer and draw a new scramble. History is kept.
    pub fn reset_timer(&mut self) {
        self.timer.reset();
        self.presenter.render_elapsed(&format_duration(0));
        self.presenter.set_visual_feedback(Feedback::Idle);
        self.generate_scramble();
    }

    pub fn reset_all(&mut self) {
        self.reset_timer();
        self.history.clear();
        self.render_history();
        debug!("session history cleared");
    }

    /// Refresh the display. Ticks from a cancelled schedule do nothing.
    pub fn tick(&mut self, handle: TickHandle) {
        if !self.timer.is_running() || !self.timer.schedule().is_live(handle) {
            return;
        }
        self.render_elapsed();
    }

    /// Advance by one logical press: stop a running solve, clear a finished
    /// one, or start from idle.
    pub fn trigger(&mut self) {
        match self.timer.status() {
            TimerStatus::Running => self.stop(),
            TimerStatus::Stopped if self.timer.accumulated_ms() > 0 => self.reset_timer(),
            TimerStatus::Idle | TimerStatus::Stopped => self.start(),
        }
    }

    /// Replace the scramble without touching the timer. Ignored mid-solve.
    pub fn new_scramble(&mut self) {
        if self.timer.is_running() {
            return;
        }
        self.generate_scramble();
    }

    /// Apply a dispatched intent. Quit and Ignore are left to the caller.
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Trigger => self.trigger(),
            Intent::NewScramble => self.new_scramble(),
            Intent::ResetAll => self.reset_all(),
            Intent::Quit | Intent::Ignore => {}
        }
    }

    fn generate_scramble(&mut self) {
        self.scramble = self.generator.generate(self.config.scramble_length);
        self.presenter.render_scramble(&self.scramble.to_string());
    }

    fn render_elapsed(&mut self) {
        let elapsed = self.timer.elapsed_ms(self.clock.now_ms());
        self.presenter.render_elapsed(&format_duration(elapsed));
    }

    fn render_history(&mut self) {
        let entries = self.history.ordered_by_duration();
        self.presenter.render_history(&entries);
    }
}
