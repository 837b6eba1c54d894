use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode config: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid trigger key {0:?}, expected a single character, \"space\" or \"enter\"")]
    TriggerKey(String),
    #[error("failed to install log subscriber: {0}")]
    Logging(String),
}
