//! Handler settings and per-team configuration

use crate::error::{HandlerError, SettingsError};
use crate::event::Event;
use crate::habitat::{DEFAULT_HABITAT_FILE, HABITAT_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "ALERT_HANDLER";

/// Per-team routing configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Chat channel to notify
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Ticketing project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Paging service key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagerduty_api_key: Option<String>,
    /// Other handler-specific keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TeamConfig {
    /// Look up a single field by its settings key
    pub fn get(&self, key: &str) -> Option<Value> {
        let known = match key {
            "channel" => &self.channel,
            "project" => &self.project,
            "pagerduty_api_key" => &self.pagerduty_api_key,
            _ => return self.extra.get(key).cloned(),
        };
        known.clone().map(Value::String)
    }
}

/// Result of a team settings lookup
#[derive(Debug, Clone, PartialEq)]
pub enum TeamData<'a> {
    /// Whole team record
    Team(&'a TeamConfig),
    /// Single field of the team record
    Field(Value),
}

/// Settings section belonging to one handler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandlerSection {
    #[serde(default)]
    pub teams: HashMap<String, TeamConfig>,
}

/// Handler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerSettings {
    /// Section of `handlers` this handler reads its teams from
    pub handler_name: String,
    /// File holding the habitat identifier
    pub habitat_file: PathBuf,
    /// Dashboard URL template containing `{habitat}`
    pub dashboard_url: String,
    /// Maximum summary length (0 = unbounded)
    pub summary_max_len: usize,
    /// Log level for the handler binary
    pub log_level: String,
    /// Per-handler sections
    pub handlers: HashMap<String, HandlerSection>,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            handler_name: "base".to_string(),
            habitat_file: PathBuf::from(DEFAULT_HABITAT_FILE),
            dashboard_url: "https://systems-{habitat}.yelpcorp.com/sensu/".to_string(),
            summary_max_len: 0,
            log_level: "info".to_string(),
            handlers: HashMap::new(),
        }
    }
}

/// Scalar settings that environment variables may override
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    handler_name: Option<String>,
    habitat_file: Option<PathBuf>,
    dashboard_url: Option<String>,
    summary_max_len: Option<usize>,
    log_level: Option<String>,
}

impl HandlerSettings {
    /// Load settings from an optional JSON file, then `ALERT_HANDLER__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load settings with an explicit environment source
    ///
    /// The file is parsed directly so team names and per-team keys keep their
    /// case; only scalar fields are taken from the environment.
    pub fn load_with_env(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                serde_json::from_str(&contents)?
            }
            None => Self::default(),
        };

        let overrides: EnvOverrides = config::Config::builder()
            .add_source(env.prefix_separator("__").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.apply(overrides);

        settings.validate()?;
        Ok(settings)
    }

    fn apply(&mut self, overrides: EnvOverrides) {
        if let Some(handler_name) = overrides.handler_name {
            self.handler_name = handler_name;
        }
        if let Some(habitat_file) = overrides.habitat_file {
            self.habitat_file = habitat_file;
        }
        if let Some(dashboard_url) = overrides.dashboard_url {
            self.dashboard_url = dashboard_url;
        }
        if let Some(summary_max_len) = overrides.summary_max_len {
            self.summary_max_len = summary_max_len;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.dashboard_url.contains(HABITAT_PLACEHOLDER) {
            return Err(SettingsError::InvalidDashboardTemplate(
                self.dashboard_url.clone(),
            ));
        }
        Ok(())
    }

    /// Teams configured for this handler
    pub fn teams(&self) -> Option<&HashMap<String, TeamConfig>> {
        self.handlers.get(&self.handler_name).map(|s| &s.teams)
    }

    /// Look up the event's team settings, or one key of them
    ///
    /// Fails if the check has no team. Yields `None` when the team or the
    /// key is not configured.
    pub fn team_data(
        &self,
        event: &Event,
        lookup_key: Option<&str>,
    ) -> Result<Option<TeamData<'_>>, HandlerError> {
        let team_name = event.team().ok_or(HandlerError::MissingTeam)?;
        let Some(team) = self.teams().and_then(|teams| teams.get(team_name)) else {
            return Ok(None);
        };

        Ok(match lookup_key {
            None => Some(TeamData::Team(team)),
            Some(key) => team.get(key).map(TeamData::Field),
        })
    }
}
