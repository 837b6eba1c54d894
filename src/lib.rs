// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod history;
pub mod input;
pub mod logging;
pub mod presenter;
pub mod runtime;
pub mod scramble;
pub mod session;
pub mod time_format;
pub mod timer;
