//! Alert message formatting
//!
//! Builds the single-line summary used as a page/chat title and the full
//! report, in prose and as structured fields, for the dispatchers.

use crate::error::HandlerError;
use crate::event::Event;
use crate::habitat::{dashboard_link, Habitat};
use crate::settings::HandlerSettings;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Team the event's check belongs to
pub fn team_name(event: &Event) -> Result<&str, HandlerError> {
    event.team().ok_or(HandlerError::MissingTeam)
}

/// Render a unix timestamp the way operators read it in reports
pub fn render_timestamp(issued: i64) -> String {
    match DateTime::<Utc>::from_timestamp(issued, 0) {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S %z").to_string(),
        None => issued.to_string(),
    }
}

/// Single-line summary, bounded to `max_len` characters when nonzero
///
/// For WARNING and CRITICAL events the tip and runbook are appended, and the
/// head of the text is cut so the suffix always survives truncation.
pub fn short_summary(event: &Event, max_len: usize) -> String {
    let mut summary = match &event.check.notification {
        Some(notification) => notification.clone(),
        None => format!(
            "{} : {} : {}",
            event.client.name, event.check.name, event.check.output
        ),
    };

    if event.check.status.is_failing() {
        let mut suffix = String::new();
        if let Some(tip) = event.tip() {
            suffix.push_str(" - ");
            suffix.push_str(tip);
        }
        if let Some(runbook) = event.runbook() {
            suffix.push_str(&format!(" ({})", runbook));
        }

        let suffix_len = suffix.chars().count();
        if max_len > 0 && suffix_len + summary.chars().count() > max_len {
            // Suffix alone (nearly) fills the budget: leave the text whole.
            if let Some(keep) = max_len.checked_sub(suffix_len).filter(|&keep| keep > 1) {
                summary = summary.chars().take(keep).collect();
            }
        }
        summary.push_str(&suffix);
    }

    summary.replace('\n', " ")
}

/// Full report fields, in the order dispatchers present them
///
/// An absent runbook or tip is `None`: serialized as `null` and rendered as
/// an empty value in the prose report, never as `false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportFields {
    #[serde(rename = "Output")]
    pub output: String,
    #[serde(rename = "Dashboard Link")]
    pub dashboard_link: String,
    #[serde(rename = "Host")]
    pub host: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Check Name")]
    pub check_name: String,
    #[serde(rename = "Command")]
    pub command: String,
    #[serde(rename = "Status")]
    pub status: i64,
    #[serde(rename = "Occurrences")]
    pub occurrences: i64,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Habitat")]
    pub habitat: String,
    #[serde(rename = "Runbook")]
    pub runbook: Option<String>,
    #[serde(rename = "Tip")]
    pub tip: Option<String>,
}

impl ReportFields {
    /// Labeled values in presentation order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Output", self.output.clone()),
            ("Dashboard Link", self.dashboard_link.clone()),
            ("Host", self.host.clone()),
            ("Timestamp", self.timestamp.clone()),
            ("Address", self.address.clone()),
            ("Check Name", self.check_name.clone()),
            ("Command", self.command.clone()),
            ("Status", self.status.to_string()),
            ("Occurrences", self.occurrences.to_string()),
            ("Team", self.team.clone()),
            ("Habitat", self.habitat.clone()),
            ("Runbook", self.runbook.clone().unwrap_or_default()),
            ("Tip", self.tip.clone().unwrap_or_default()),
        ]
    }
}

impl fmt::Display for ReportFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let runbook = self.runbook.as_deref().unwrap_or_default();
        let tip = self.tip.as_deref().unwrap_or_default();

        writeln!(f, "{}", self.output)?;
        writeln!(f)?;
        writeln!(f, "Dashboard Link: {}", self.dashboard_link)?;
        writeln!(f, "Runbook: {}", runbook)?;
        writeln!(f, "Tip: {}", tip)?;
        writeln!(f)?;
        writeln!(f, "Command:  {}", self.command)?;
        writeln!(f, "Status:  {}", self.status)?;
        writeln!(f)?;
        writeln!(f, "Timestamp: {}", self.timestamp)?;
        writeln!(f, "Occurrences:  {}", self.occurrences)?;
        writeln!(f)?;
        writeln!(f, "Team: {}", self.team)?;
        writeln!(f, "Host: {}", self.host)?;
        writeln!(f, "Address:  {}", self.address)?;
        writeln!(f, "Check Name:  {}", self.check_name)?;
        writeln!(f, "Habitat: {}", self.habitat)?;
        writeln!(f)
    }
}

/// Formats alert text for one habitat
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    habitat: Habitat,
    dashboard_url: String,
}

impl MessageFormatter {
    /// Create a formatter for a known habitat and dashboard URL template
    pub fn new(habitat: Habitat, dashboard_url: impl Into<String>) -> Self {
        Self {
            habitat,
            dashboard_url: dashboard_url.into(),
        }
    }

    /// Create a formatter, reading the habitat from the configured file
    pub fn from_settings(settings: &HandlerSettings) -> Self {
        let habitat = Habitat::read_or_unknown(&settings.habitat_file);
        info!("Creating message formatter for habitat {}", habitat);
        Self::new(habitat, settings.dashboard_url.clone())
    }

    pub fn habitat(&self) -> &Habitat {
        &self.habitat
    }

    pub fn dashboard_link(&self) -> String {
        dashboard_link(&self.dashboard_url, &self.habitat)
    }

    /// Structured report; fails if the check has no team
    pub fn full_report_fields(&self, event: &Event) -> Result<ReportFields, HandlerError> {
        let team = team_name(event)?.to_string();
        Ok(ReportFields {
            output: event.check.output.clone(),
            dashboard_link: self.dashboard_link(),
            host: event.client.name.clone(),
            timestamp: render_timestamp(event.check.issued),
            address: event.client.address.clone(),
            check_name: event.check.name.clone(),
            command: event.check.command.clone(),
            status: event.check.status.code(),
            occurrences: event.occurrences,
            team,
            habitat: self.habitat.to_string(),
            runbook: event.check.runbook.clone(),
            tip: event.check.tip.clone(),
        })
    }

    /// Prose report; fails if the check has no team
    pub fn full_report(&self, event: &Event) -> Result<String, HandlerError> {
        Ok(self.full_report_fields(event)?.to_string())
    }
}
