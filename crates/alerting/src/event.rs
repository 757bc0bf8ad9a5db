//! Monitoring event model
//!
//! Mirrors the JSON shape the monitoring server hands to handlers: a client,
//! the check result, and the occurrence count tracked upstream.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Check name whose interval is fixed by the server rather than configured
pub const KEEPALIVE_CHECK: &str = "keepalive";

/// Heartbeat period of keepalive checks (seconds)
pub const KEEPALIVE_INTERVAL_SECS: i64 = 20;

/// Exit status reported by a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum CheckStatus {
    #[default]
    Ok,
    Warning,
    Critical,
    /// Any code outside 0..=2, kept verbatim
    Unknown(i64),
}

impl CheckStatus {
    /// Raw numeric status code
    pub fn code(self) -> i64 {
        match self {
            CheckStatus::Ok => 0,
            CheckStatus::Warning => 1,
            CheckStatus::Critical => 2,
            CheckStatus::Unknown(code) => code,
        }
    }

    /// Human-readable status name
    pub fn human(self) -> &'static str {
        match self {
            CheckStatus::Ok => "OK",
            CheckStatus::Warning => "WARNING",
            CheckStatus::Critical => "CRITICAL",
            CheckStatus::Unknown(_) => "UNKNOWN",
        }
    }

    /// WARNING or CRITICAL
    pub fn is_failing(self) -> bool {
        matches!(self, CheckStatus::Warning | CheckStatus::Critical)
    }
}

impl From<i64> for CheckStatus {
    fn from(code: i64) -> Self {
        match code {
            0 => CheckStatus::Ok,
            1 => CheckStatus::Warning,
            2 => CheckStatus::Critical,
            other => CheckStatus::Unknown(other),
        }
    }
}

impl From<CheckStatus> for i64 {
    fn from(status: CheckStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.human())
    }
}

/// Map a raw status code to its human-readable name
pub fn human_status(code: i64) -> &'static str {
    CheckStatus::from(code).human()
}

/// Why the server emitted this event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Fresh transition into a failing state
    Create,
    Resolve,
    Flapping,
    #[serde(other)]
    Other,
}

/// Re-alert cadence configured on a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealertPolicy {
    /// Alert on every Nth failed attempt past `alert_after`
    Every(i64),
    /// Alert on failed attempts 1, 2, 4, 8, ...
    ExponentialBackoff,
}

impl RealertPolicy {
    /// Raw `realert_every` value selecting exponential backoff
    pub const BACKOFF_SENTINEL: i64 = -1;
}

impl From<i64> for RealertPolicy {
    fn from(raw: i64) -> Self {
        if raw == Self::BACKOFF_SENTINEL {
            RealertPolicy::ExponentialBackoff
        } else {
            RealertPolicy::Every(raw)
        }
    }
}

impl Default for RealertPolicy {
    fn default() -> Self {
        RealertPolicy::Every(1)
    }
}

/// Host the check ran on
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
    pub name: String,
    pub address: String,
}

/// Check definition and its latest result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Check {
    pub name: String,
    pub status: CheckStatus,
    pub output: String,
    pub command: String,
    /// Unix timestamp the check was issued at
    pub issued: i64,
    /// Poll interval (seconds); absent for passive checks
    pub interval: Option<i64>,
    /// Minimum failing duration before alerting (seconds)
    pub alert_after: Option<i64>,
    /// Re-alert cadence; -1 selects exponential backoff
    pub realert_every: Option<i64>,
    /// Replaces the generated summary text when set
    pub notification: Option<String>,
    pub tip: Option<String>,
    pub runbook: Option<String>,
    pub team: Option<String>,
    pub page: Option<bool>,
}

/// Event delivered to a handler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub client: Client,
    pub check: Check,
    /// Consecutive non-OK results, maintained upstream
    pub occurrences: i64,
    pub action: Option<Action>,
}

impl Event {
    pub fn is_ok(&self) -> bool {
        self.check.status == CheckStatus::Ok
    }

    pub fn is_warning(&self) -> bool {
        self.check.status == CheckStatus::Warning
    }

    pub fn is_critical(&self) -> bool {
        self.check.status == CheckStatus::Critical
    }

    pub fn is_keepalive(&self) -> bool {
        self.check.name == KEEPALIVE_CHECK
    }

    pub fn is_create(&self) -> bool {
        self.action == Some(Action::Create)
    }

    pub fn should_page(&self) -> bool {
        self.check.page.unwrap_or(false)
    }

    pub fn runbook(&self) -> Option<&str> {
        self.check.runbook.as_deref()
    }

    pub fn tip(&self) -> Option<&str> {
        self.check.tip.as_deref()
    }

    pub fn team(&self) -> Option<&str> {
        self.check.team.as_deref()
    }

    /// Interval used for cadence gating; keepalives always beat every 20s
    pub fn effective_interval(&self) -> i64 {
        if self.is_keepalive() {
            KEEPALIVE_INTERVAL_SECS
        } else {
            self.check.interval.unwrap_or(0)
        }
    }

    pub fn alert_after(&self) -> i64 {
        self.check.alert_after.unwrap_or(0)
    }

    pub fn realert_policy(&self) -> RealertPolicy {
        self.check
            .realert_every
            .map(RealertPolicy::from)
            .unwrap_or_default()
    }
}
