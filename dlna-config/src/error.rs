//! Error types for the configuration store

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration directory could be determined for this platform
    #[error("could not determine a configuration directory; set DLNA_CONFIG_DIR")]
    NoConfigDir,

    #[error("device name must not be blank")]
    BlankDeviceName,

    #[error("failed to write configuration to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
