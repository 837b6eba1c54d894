use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use tracing::trace;

/// Default key gap after which a terminal without release reporting is
/// assumed to have let go of the trigger key. Must stay above the initial
/// auto-repeat delay (660ms on stock X11, 500-600ms elsewhere).
pub const DEFAULT_RELEASE_AFTER_MS: u64 = 1_000;

/// Two taps closer than this form a double tap
pub const DOUBLE_TAP_WINDOW_MS: u64 = 300;

/// How the terminal tells us a key went up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyRelease {
    /// Release events are delivered
    Reported,
    /// Only presses arrive; a quiet gap counts as a release
    Inferred { after_ms: u64 },
}

/// Input capabilities, probed once at startup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputMode {
    pub pointer: bool,
    pub key_release: KeyRelease,
}

impl InputMode {
    pub fn keyboard_only(key_release: KeyRelease) -> Self {
        Self {
            pointer: false,
            key_release,
        }
    }

    /// Resolve the terminal's capabilities. `pointer` is whether mouse
    /// capture was requested and enabled.
    pub fn probe(pointer: bool, release_after_ms: u64) -> Self {
        let key_release = match crossterm::terminal::supports_keyboard_enhancement() {
            Ok(true) => KeyRelease::Reported,
            _ => KeyRelease::Inferred {
                after_ms: release_after_ms,
            },
        };
        Self {
            pointer,
            key_release,
        }
    }
}

/// Raw device event, before any debouncing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawInput {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    Tap,
    DoubleTap,
}

impl From<&KeyEvent> for RawInput {
    fn from(key: &KeyEvent) -> Self {
        match key.kind {
            KeyEventKind::Release => RawInput::KeyUp(key.code),
            // auto-repeat arrives as a stream of key-downs
            KeyEventKind::Press | KeyEventKind::Repeat => RawInput::KeyDown(key.code),
        }
    }
}

/// What the session should do in response to an input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Trigger,
    NewScramble,
    ResetAll,
    Quit,
    Ignore,
}

/// Turns keyboard and pointer input into intents, one trigger per
/// physical press of the trigger key or per tap.
#[derive(Debug)]
pub struct InputDispatcher {
    mode: InputMode,
    trigger_key: KeyCode,
    trigger_held: bool,
    last_trigger_down_ms: Option<u64>,
}

impl InputDispatcher {
    pub fn new(mode: InputMode, trigger_key: KeyCode) -> Self {
        Self {
            mode,
            trigger_key,
            trigger_held: false,
            last_trigger_down_ms: None,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn trigger_key(&self) -> KeyCode {
        self.trigger_key
    }

    pub fn dispatch(&mut self, input: RawInput, now_ms: u64) -> Intent {
        let intent = match input {
            RawInput::KeyDown(code) if code == self.trigger_key => self.trigger_down(now_ms),
            RawInput::KeyUp(code) if code == self.trigger_key => {
                self.trigger_held = false;
                Intent::Ignore
            }
            RawInput::KeyDown(code) => command_for(code),
            RawInput::KeyUp(_) => Intent::Ignore,
            RawInput::Tap if self.mode.pointer => Intent::Trigger,
            // double taps only ever suppress their default action
            RawInput::Tap | RawInput::DoubleTap => Intent::Ignore,
        };
        trace!(?input, ?intent, "dispatched");
        intent
    }

    fn trigger_down(&mut self, now_ms: u64) -> Intent {
        let previous = self.last_trigger_down_ms.replace(now_ms);

        if let KeyRelease::Inferred { after_ms } = self.mode.key_release {
            let quiet = previous.map_or(true, |prev| now_ms.saturating_sub(prev) > after_ms);
            if quiet {
                self.trigger_held = false;
            }
        }

        if self.trigger_held {
            return Intent::Ignore;
        }
        self.trigger_held = true;
        Intent::Trigger
    }
}

fn command_for(code: KeyCode) -> Intent {
    match code {
        KeyCode::Char('n') => Intent::NewScramble,
        KeyCode::Char('r') => Intent::ResetAll,
        KeyCode::Esc | KeyCode::Char('q') => Intent::Quit,
        _ => Intent::Ignore,
    }
}

/// Turns left-button presses into taps, adding a double tap when two
/// arrive within `DOUBLE_TAP_WINDOW_MS`.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last_tap_ms: Option<u64>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_mouse(&mut self, event: &MouseEvent, now_ms: u64) -> Vec<RawInput> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => self.on_press(now_ms),
            _ => vec![],
        }
    }

    pub fn on_press(&mut self, now_ms: u64) -> Vec<RawInput> {
        match self.last_tap_ms {
            Some(prev) if now_ms.saturating_sub(prev) <= DOUBLE_TAP_WINDOW_MS => {
                // a third quick tap starts a new pair
                self.last_tap_ms = None;
                vec![RawInput::Tap, RawInput::DoubleTap]
            }
            _ => {
                self.last_tap_ms = Some(now_ms);
                vec![RawInput::Tap]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crossterm::event::{KeyEventState, KeyModifiers};

    const SPACE: KeyCode = KeyCode::Char(' ');

    fn reported() -> InputDispatcher {
        InputDispatcher::new(InputMode::keyboard_only(KeyRelease::Reported), SPACE)
    }

    fn inferred() -> InputDispatcher {
        InputDispatcher::new(
            InputMode::keyboard_only(KeyRelease::Inferred {
                after_ms: DEFAULT_RELEASE_AFTER_MS,
            }),
            SPACE,
        )
    }

    #[test]
    fn test_held_key_triggers_once() {
        let mut d = reported();
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 0), Intent::Trigger);
        for t in 1..30 {
            assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), t * 33), Intent::Ignore);
        }
        assert_eq!(d.dispatch(RawInput::KeyUp(SPACE), 1_000), Intent::Ignore);
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 1_010), Intent::Trigger);
    }

    #[test]
    fn test_reported_mode_waits_for_release() {
        let mut d = reported();
        d.dispatch(RawInput::KeyDown(SPACE), 0);
        // however long the gap, no release means no new trigger
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 60_000), Intent::Ignore);
    }

    #[test]
    fn test_other_key_release_does_not_rearm() {
        let mut d = reported();
        d.dispatch(RawInput::KeyDown(SPACE), 0);
        d.dispatch(RawInput::KeyUp(KeyCode::Char('x')), 5);
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 10), Intent::Ignore);
    }

    #[test]
    fn test_inferred_release_suppresses_repeat_stream() {
        let mut d = inferred();
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 0), Intent::Trigger);
        // typical auto-repeat: initial delay then a steady stream
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 500), Intent::Ignore);
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 533), Intent::Ignore);
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 566), Intent::Ignore);
    }

    #[test]
    fn test_inferred_release_outlasts_x11_repeat_delay() {
        let mut d = inferred();
        let triggers = [0, 660, 700, 740, 780]
            .into_iter()
            .filter(|&t| d.dispatch(RawInput::KeyDown(SPACE), t) == Intent::Trigger)
            .count();
        assert_eq!(triggers, 1);
    }

    #[test]
    fn test_inferred_release_rearms_after_gap() {
        let mut d = inferred();
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 0), Intent::Trigger);
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 5_000), Intent::Trigger);
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 6_200), Intent::Trigger);
    }

    #[test]
    fn test_inferred_mode_still_honours_real_release() {
        let mut d = inferred();
        d.dispatch(RawInput::KeyDown(SPACE), 0);
        d.dispatch(RawInput::KeyUp(SPACE), 100);
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 200), Intent::Trigger);
    }

    #[test]
    fn test_command_keys() {
        let mut d = reported();
        assert_eq!(
            d.dispatch(RawInput::KeyDown(KeyCode::Char('n')), 0),
            Intent::NewScramble
        );
        assert_eq!(
            d.dispatch(RawInput::KeyDown(KeyCode::Char('r')), 0),
            Intent::ResetAll
        );
        assert_eq!(d.dispatch(RawInput::KeyDown(KeyCode::Esc), 0), Intent::Quit);
        assert_eq!(
            d.dispatch(RawInput::KeyDown(KeyCode::Char('q')), 0),
            Intent::Quit
        );
        assert_eq!(
            d.dispatch(RawInput::KeyDown(KeyCode::Char('z')), 0),
            Intent::Ignore
        );
    }

    #[test]
    fn test_custom_trigger_key() {
        let mut d = InputDispatcher::new(
            InputMode::keyboard_only(KeyRelease::Reported),
            KeyCode::Enter,
        );
        assert_eq!(d.trigger_key(), KeyCode::Enter);
        assert_eq!(d.dispatch(RawInput::KeyDown(SPACE), 0), Intent::Ignore);
        assert_eq!(d.dispatch(RawInput::KeyDown(KeyCode::Enter), 0), Intent::Trigger);
    }

    #[test]
    fn test_taps_need_pointer_mode() {
        let mut keyboard = reported();
        assert_eq!(keyboard.dispatch(RawInput::Tap, 0), Intent::Ignore);

        let mut pointer = InputDispatcher::new(
            InputMode {
                pointer: true,
                key_release: KeyRelease::Reported,
            },
            SPACE,
        );
        assert_eq!(pointer.dispatch(RawInput::Tap, 0), Intent::Trigger);
        assert_eq!(pointer.dispatch(RawInput::Tap, 1), Intent::Trigger);
        assert_eq!(pointer.dispatch(RawInput::DoubleTap, 1), Intent::Ignore);
    }

    #[test]
    fn test_key_event_translation() {
        let press = KeyEvent::new(SPACE, KeyModifiers::NONE);
        assert_eq!(RawInput::from(&press), RawInput::KeyDown(SPACE));

        let repeat = KeyEvent {
            code: SPACE,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Repeat,
            state: KeyEventState::NONE,
        };
        assert_eq!(RawInput::from(&repeat), RawInput::KeyDown(SPACE));

        let release = KeyEvent::new_with_kind(SPACE, KeyModifiers::NONE, KeyEventKind::Release);
        assert_matches!(RawInput::from(&release), RawInput::KeyUp(KeyCode::Char(' ')));
    }

    #[test]
    fn test_pointer_tracker_double_tap() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.on_press(0), vec![RawInput::Tap]);
        assert_eq!(tracker.on_press(200), vec![RawInput::Tap, RawInput::DoubleTap]);
        assert_eq!(tracker.on_press(350), vec![RawInput::Tap]);
        assert_eq!(tracker.on_press(2_000), vec![RawInput::Tap]);
    }

    #[test]
    fn test_pointer_tracker_ignores_other_buttons() {
        let mut tracker = PointerTracker::new();
        let right = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Right),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert!(tracker.on_mouse(&right, 0).is_empty());

        let left = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            ..right
        };
        assert_eq!(tracker.on_mouse(&left, 0), vec![RawInput::Tap]);
    }
}
