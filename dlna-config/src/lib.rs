//! Persistent configuration for dlna-cast
//!
//! The only persisted setting is the default renderer used when a command is
//! given no device name. It lives in `config.json` inside the configuration
//! directory:
//!
//! 1. `$DLNA_CONFIG_DIR` when set
//! 2. otherwise `<platform config dir>/dlna-cast`
//!
//! A missing or unreadable file is never an error; it simply yields the
//! default (empty) configuration.
//!
//! ```no_run
//! use dlna_config::ConfigStore;
//!
//! let store = ConfigStore::new()?;
//! store.save_default_device("Living Room TV")?;
//! assert_eq!(store.load_default_device().as_deref(), Some("Living Room TV"));
//! # Ok::<(), dlna_config::ConfigError>(())
//! ```

mod error;

pub use error::{ConfigError, Result};

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the configuration directory
pub const ENV_CONFIG_DIR: &str = "DLNA_CONFIG_DIR";

/// Directory name under the platform configuration directory
pub const APP_DIR_NAME: &str = "dlna-cast";

/// Configuration file name inside the configuration directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Contents of `config.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlnaConfig {
    /// Renderer name used when a command names no device
    #[serde(default)]
    pub default_device: Option<String>,
}

/// Reads and writes the configuration file.
///
/// Every read goes to disk; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at the standard location
    pub fn new() -> Result<Self> {
        let dir = match env::var_os(ENV_CONFIG_DIR).filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir().ok_or(ConfigError::NoConfigDir)?.join(APP_DIR_NAME),
        };
        Ok(Self::in_dir(dir))
    }

    /// Store using `config.json` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::at(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    /// Store using an explicit file path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration, falling back to defaults when the file is
    /// missing, unreadable or not valid JSON.
    pub fn load(&self) -> DlnaConfig {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Config file not found, using defaults");
                return DlnaConfig::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), "Failed to read config file: {}", e);
                return DlnaConfig::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "Ignoring malformed config file: {}", e);
            DlnaConfig::default()
        })
    }

    /// Replace the configuration file with `config`.
    ///
    /// The new content is written to a sibling temporary file first and then
    /// renamed over the target, so readers see either the old or the new file.
    pub fn save(&self, config: &DlnaConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            write_err(e)
        })?;

        debug!(path = %self.path.display(), "Saved configuration");
        Ok(())
    }

    pub fn load_default_device(&self) -> Option<String> {
        self.load()
            .default_device
            .filter(|name| !name.trim().is_empty())
    }

    /// Persist `name` as the default device, trimmed.
    ///
    /// # Errors
    ///
    /// `BlankDeviceName` when `name` is empty or whitespace; the stored value
    /// is left untouched.
    pub fn save_default_device(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::BlankDeviceName);
        }

        let mut config = self.load();
        config.default_device = Some(name.to_string());
        self.save(&config)
    }

    pub fn clear_default_device(&self) -> Result<()> {
        let mut config = self.load();
        config.default_device = None;
        self.save(&config)
    }
}
