//! Alert Handler
//!
//! Runs the repeated-alert filter over one event and renders the alert text a
//! dispatcher would send. Nothing is delivered.

use alerting::{
    decide, short_summary, Decision, Event, HandlerError, HandlerSettings, MessageFormatter,
    ReportFields,
};
use serde::Serialize;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// What the handler would do with an event
#[derive(Debug, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum HandlerOutput {
    Suppress {
        reason: String,
    },
    Proceed {
        summary: String,
        page: bool,
        report: ReportFields,
    },
}

/// Filter and format a single event
pub fn handle(
    event: &Event,
    settings: &HandlerSettings,
    formatter: &MessageFormatter,
) -> Result<HandlerOutput, HandlerError> {
    if let Decision::Suppress(reason) = decide(event) {
        info!(
            client = %event.client.name,
            check = %event.check.name,
            "Not alerting: {}", reason
        );
        return Ok(HandlerOutput::Suppress {
            reason: reason.to_string(),
        });
    }

    let report = formatter.full_report_fields(event)?;
    let summary = short_summary(event, settings.summary_max_len);
    debug!("Alert summary: {}", summary);

    Ok(HandlerOutput::Proceed {
        summary,
        page: event.should_page(),
        report,
    })
}

/// Initialize logging on stderr; unparseable levels fall back to INFO
pub fn init_logging(level: &str) {
    let level = level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
