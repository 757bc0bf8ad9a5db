//! Handler Error Types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort processing of a single event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The check carries no team, so the alert cannot be routed
    #[error("check did not provide a team name")]
    MissingTeam,
}

/// Errors while loading handler settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("Failed to read settings file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Settings file is not valid JSON for these settings
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// Environment overrides could not be read
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// Dashboard URL template has no habitat placeholder
    #[error("Dashboard URL template {0:?} does not contain {{habitat}}")]
    InvalidDashboardTemplate(String),
}
