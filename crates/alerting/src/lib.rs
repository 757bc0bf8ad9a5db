//! Alerting System
//!
//! Decides whether a repeated monitoring event should alert, with fixed
//! cadence or exponential backoff re-alerting, and formats bounded alert text.

mod error;
mod event;
mod filter;
mod formatter;
mod habitat;
mod settings;

pub use error::{HandlerError, SettingsError};
pub use event::{
    human_status, Action, Check, CheckStatus, Client, Event, RealertPolicy, KEEPALIVE_CHECK,
    KEEPALIVE_INTERVAL_SECS,
};
pub use filter::{decide, Decision, SuppressReason};
pub use formatter::{render_timestamp, short_summary, team_name, MessageFormatter, ReportFields};
pub use habitat::{dashboard_link, Habitat, DEFAULT_HABITAT_FILE};
pub use settings::{HandlerSection, HandlerSettings, TeamConfig, TeamData, ENV_PREFIX};
