//! Unified path management for relay's local files.
//!
//! Configuration lives in the platform config directory, the persisted
//! history and exports in the platform data directory.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for relay.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/relay/             # Config directory
/// └── config.toml              # Application configuration
///
/// ~/.local/share/relay/        # Data directory
/// ├── history.json             # Persisted chat history (one document)
/// └── exports/                 # JSON/Markdown exports
/// ```
///
/// Platform equivalents apply on macOS and Windows.
pub struct RelayPaths;

impl RelayPaths {
    /// Returns the relay configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("relay"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the relay data directory.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("relay"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted history document.
    pub fn history_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("history.json"))
    }

    /// Returns the directory where exports are written.
    pub fn exports_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("exports"))
    }
}
