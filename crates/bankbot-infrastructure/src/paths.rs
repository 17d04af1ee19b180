//! Unified path management for bankbot files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/bankbot/           # Config directory (platform default)
//! ├── config.toml              # Client configuration
//! ├── session.toml             # Cached session (identity, cookies)
//! └── logs/                    # Client logs
//!     └── bankbot.log.YYYY-MM-DD
//! ```
//!
//! A custom root (e.g. `--state-dir`) replaces `~/.config/bankbot` entirely.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "bankbot";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for bankbot_core::BankbotError {
    fn from(err: PathError) -> Self {
        bankbot_core::BankbotError::config(err.to_string())
    }
}

/// Files and directories managed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Session,
    Logs,
}

/// Resolves every path the client reads or writes.
#[derive(Debug, Clone)]
pub struct BankbotPaths {
    root: Option<PathBuf>,
}

impl BankbotPaths {
    /// Creates a resolver. `None` uses the platform config directory.
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Returns the bankbot configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/bankbot/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        let dir = self.config_dir()?;
        Ok(match service {
            ServiceType::Config => dir.join("config.toml"),
            ServiceType::Session => dir.join("session.toml"),
            ServiceType::Logs => dir.join("logs"),
        })
    }
}

impl Default for BankbotPaths {
    fn default() -> Self {
        Self::new(None)
    }
}
