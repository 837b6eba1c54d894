use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tracing::warn;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum TimerEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    /// The requested wake-up elapsed with no input
    Tick,
    /// The input side is gone; nothing more will ever arrive
    Closed,
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait TimerEventSource: Send + 'static {
    /// Block until an event arrives or the source is closed.
    fn recv(&self) -> Result<TimerEvent, RecvError>;

    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError>;
}

/// Production event source: a reader thread forwarding crossterm events
pub struct CrosstermEventSource {
    rx: Receiver<TimerEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                Ok(CtEvent::Key(key)) => TimerEvent::Key(key),
                Ok(CtEvent::Mouse(mouse)) => TimerEvent::Mouse(mouse),
                Ok(CtEvent::Resize(_, _)) => TimerEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    // dropping the sender closes the runner
                    warn!(error = %e, "terminal input failed");
                    break;
                }
            };
            if tx.send(ev).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEventSource for CrosstermEventSource {
    fn recv(&self) -> Result<TimerEvent, RecvError> {
        self.rx.recv()
    }

    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed event source for tests
pub struct TestEventSource {
    rx: Receiver<TimerEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TimerEvent>) -> Self {
        Self { rx }
    }
}

impl TimerEventSource for TestEventSource {
    fn recv(&self) -> Result<TimerEvent, RecvError> {
        self.rx.recv()
    }

    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the application one event at a time. There is no free-running
/// ticker: the caller says when it next needs to wake up.
pub struct Runner<E: TimerEventSource> {
    event_source: E,
}

impl<E: TimerEventSource> Runner<E> {
    pub fn new(event_source: E) -> Self {
        Self { event_source }
    }

    /// Next event. With `wake` set, returns `Tick` if nothing arrives in
    /// time; with `None`, sleeps until input. `Closed` once the source is gone.
    pub fn step(&self, wake: Option<Duration>) -> TimerEvent {
        match wake {
            Some(timeout) => match self.event_source.recv_timeout(timeout) {
                Ok(ev) => ev,
                Err(RecvTimeoutError::Timeout) => TimerEvent::Tick,
                Err(RecvTimeoutError::Disconnected) => TimerEvent::Closed,
            },
            None => self.event_source.recv().unwrap_or(TimerEvent::Closed),
        }
    }
}
