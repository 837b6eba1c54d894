mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use cubetime::{
    app_dirs::AppDirs,
    clock::{Clock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore},
    display::TerminalDisplay,
    error::ConfigError,
    input::{InputDispatcher, InputMode, Intent, KeyRelease, PointerTracker, RawInput},
    logging,
    runtime::{CrosstermEventSource, Runner, TimerEvent, TimerEventSource},
    scramble::ScrambleGenerator,
    session::TimerSession,
    timer::TickHandle,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Position, Rect},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::info;

/// speed-cubing practice timer with scrambles and a ranked session history
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A speed-cubing practice timer for the terminal. Press the trigger key (or tap the timer) to start, again to stop, once more to clear the time and get a fresh scramble."
)]
pub struct Cli {
    /// number of moves in each scramble
    #[clap(short = 'l', long)]
    scramble_length: Option<usize>,

    /// display refresh interval in milliseconds while the timer runs
    #[clap(long)]
    tick_ms: Option<u64>,

    /// key that starts and stops the timer: "space", "enter" or a single character
    #[clap(short = 'k', long)]
    trigger_key: Option<String>,

    /// disable starting and stopping the timer with mouse clicks
    #[clap(long)]
    no_pointer: bool,

    /// write debug logs to the default state directory
    #[clap(long)]
    log: bool,

    /// write debug logs to this file
    #[clap(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// store the resulting settings in the config file as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line flags over the stored config
    fn apply_to(&self, mut cfg: Config) -> Config {
        if let Some(n) = self.scramble_length {
            cfg.scramble_length = n;
        }
        if let Some(ms) = self.tick_ms {
            cfg.tick_ms = ms;
        }
        if let Some(ref key) = self.trigger_key {
            cfg.trigger_key = key.clone();
        }
        if self.no_pointer {
            cfg.pointer = false;
        }
        cfg
    }

    fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| if self.log { AppDirs::log_path() } else { None })
    }

    /// Stored config with flags applied, validated, and written back when
    /// `--save-config` is given
    fn resolve_config<S: ConfigStore>(&self, store: &S) -> Result<Config, ConfigError> {
        let config = self.apply_to(store.load());
        config.trigger_key_code()?;
        if self.save_config {
            store.save(&config)?;
            info!("saved config");
        }
        Ok(config)
    }
}

#[derive(Debug)]
pub struct App {
    pub session: TimerSession<TerminalDisplay, SystemClock>,
    pub dispatcher: InputDispatcher,
    pub pointer: PointerTracker,
    armed: Option<TickHandle>,
}

impl App {
    pub fn new(config: &Config, mode: InputMode) -> Result<Self, ConfigError> {
        let trigger_key = config.trigger_key_code()?;
        Ok(Self {
            session: TimerSession::new(
                config.session_config(),
                ScrambleGenerator::new(),
                SystemClock,
                TerminalDisplay::new(),
            ),
            dispatcher: InputDispatcher::new(mode, trigger_key),
            pointer: PointerTracker::new(),
            armed: None,
        })
    }

    /// How long the loop may sleep before it must wake on its own: the tick
    /// interval while a tick is live, the rest of a stop flash, otherwise
    /// until input. Arms the live tick handle for the next `Tick`.
    pub fn next_wake(&mut self, now: Instant) -> Option<Duration> {
        self.armed = self.session.tick_handle();
        match self.armed {
            Some(_) => Some(self.session.tick_interval()),
            None => self.session.presenter().flash_remaining(now),
        }
    }

    /// Apply one event. Returns false once the user asked to quit.
    pub fn handle_event(&mut self, event: TimerEvent, area: Rect) -> bool {
        let now_ms = SystemClock.now_ms();

        match event {
            TimerEvent::Tick => {
                // a handle cancelled since it was armed does nothing
                if let Some(handle) = self.armed.take() {
                    self.session.tick(handle);
                }
            }
            TimerEvent::Closed => return false,
            TimerEvent::Resize => {}
            TimerEvent::Key(key) => {
                // ctrl+c to quit
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    return false;
                }
                let intent = self.dispatcher.dispatch(RawInput::from(&key), now_ms);
                if intent == Intent::Quit {
                    return false;
                }
                self.session.apply(intent);
            }
            TimerEvent::Mouse(mouse) => {
                let on_timer = ui::timer_area(area).contains(Position::new(mouse.column, mouse.row));
                if self.dispatcher.mode().pointer && on_timer {
                    for raw in self.pointer.on_mouse(&mouse, now_ms) {
                        let intent = self.dispatcher.dispatch(raw, now_ms);
                        self.session.apply(intent);
                    }
                }
            }
        }
        true
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_path() {
        logging::init_file_logging(&path)?;
    }

    // reject a bad trigger key before taking over the terminal
    let store = FileConfigStore::new();
    let config = cli.resolve_config(&store)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let pointer = config.pointer && execute!(stdout, EnableMouseCapture).is_ok();
    let mode = InputMode::probe(pointer, config.release_after_ms);
    if mode.key_release == KeyRelease::Reported {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    info!(?mode, config_path = %store.path().display(), "starting");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = match App::new(&config, mode) {
        Ok(mut app) => {
            let runner = Runner::new(CrosstermEventSource::new());
            start_tui(&mut terminal, &mut app, &runner)
        }
        Err(e) => Err(e.into()),
    };

    if mode.key_release == KeyRelease::Reported {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    if pointer {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: TimerEventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    let mut was_flashing = false;
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let wake = app.next_wake(Instant::now());
        let event = runner.step(wake);
        let resized = matches!(event, TimerEvent::Resize);
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);

        if !app.handle_event(event, area) {
            break;
        }

        let flashing = app.session.presenter().is_flashing(Instant::now());
        let dirty = app.session.presenter_mut().take_dirty();
        if dirty || resized || flashing != was_flashing {
            terminal.draw(|f| ui::draw(app, f))?;
        }
        was_flashing = flashing;
    }

    Ok(())
}
