use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::error::ConfigError;
use crate::input::DEFAULT_RELEASE_AFTER_MS;
use crate::scramble::DEFAULT_SCRAMBLE_LENGTH;
use crate::session::SessionConfig;
use crate::timer::TICK_INTERVAL_MS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub scramble_length: usize,
    pub tick_ms: u64,
    pub trigger_key: String,
    pub pointer: bool,
    pub release_after_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scramble_length: DEFAULT_SCRAMBLE_LENGTH,
            tick_ms: TICK_INTERVAL_MS,
            trigger_key: "space".to_string(),
            pointer: true,
            release_after_ms: DEFAULT_RELEASE_AFTER_MS,
        }
    }
}

impl Config {
    pub fn trigger_key_code(&self) -> Result<KeyCode, ConfigError> {
        parse_key(&self.trigger_key)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            scramble_length: self.scramble_length.max(1),
            tick_interval: Duration::from_millis(self.tick_ms.max(1)),
        }
    }
}

fn parse_key(name: &str) -> Result<KeyCode, ConfigError> {
    match name.to_lowercase().as_str() {
        "space" | " " => Ok(KeyCode::Char(' ')),
        "enter" => Ok(KeyCode::Enter),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                _ => Err(ConfigError::TriggerKey(name.to_string())),
            }
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("cubetime_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data).map_err(io_err)
    }
}
