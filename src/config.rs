//! Runtime configuration and snapshot path resolution.

use crate::detector::MarkerKind;
use crate::reader::RetryPolicy;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Location of the export below the platform data directory.
pub const SNAPSHOT_SUBPATH: [&str; 3] = ["Balatro", "mcp-bridge", "mcp_gamestate.json"];

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot locate the game data directory: {0} is not set")]
    MissingBaseDir(&'static str),
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub snapshot_path: PathBuf,
    pub poll_interval: Duration,
    pub retry: RetryPolicy,
    pub marker: MarkerKind,
}

impl WatchConfig {
    /// Defaults for a snapshot at `path`.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: path.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry: RetryPolicy::default(),
            marker: MarkerKind::default(),
        }
    }

    /// Defaults with the platform snapshot path.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::for_path(default_snapshot_path()?))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

/// The platform data directory the game writes under.
///
/// `%APPDATA%` on Windows, `~/Library/Application Support` on macOS,
/// `$XDG_DATA_HOME` or `~/.local/share` elsewhere.
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    base_dir_from(|key| env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from))
}

fn base_dir_from<F>(var: F) -> Result<PathBuf, ConfigError>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    if cfg!(windows) {
        return var("APPDATA").ok_or(ConfigError::MissingBaseDir("APPDATA"));
    }
    if cfg!(target_os = "macos") {
        return var("HOME")
            .map(|home| home.join("Library").join("Application Support"))
            .ok_or(ConfigError::MissingBaseDir("HOME"));
    }
    if let Some(xdg) = var("XDG_DATA_HOME") {
        return Ok(xdg);
    }
    var("HOME")
        .map(|home| home.join(".local").join("share"))
        .ok_or(ConfigError::MissingBaseDir("HOME"))
}

/// Full path of the export file under `base`.
pub fn snapshot_path_in(base: &Path) -> PathBuf {
    SNAPSHOT_SUBPATH.iter().fold(base.to_path_buf(), |p, part| p.join(part))
}

pub fn default_snapshot_path() -> Result<PathBuf, ConfigError> {
    Ok(snapshot_path_in(&base_dir()?))
}
