//! Alert Handler - Main Entry Point
//!
//! Usage: `alert-handler [SETTINGS_JSON] < event.json`

use alerting::{Event, HandlerSettings, MessageFormatter};
use anyhow::Context;
use handler::{handle, init_logging};
use std::io;
use std::path::PathBuf;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = HandlerSettings::load(settings_path.as_deref())
        .context("loading handler settings")?;

    init_logging(&settings.log_level);
    info!("=== Alert Handler v{} ===", env!("CARGO_PKG_VERSION"));

    let event: Event =
        serde_json::from_reader(io::stdin().lock()).context("reading event from stdin")?;
    let formatter = MessageFormatter::from_settings(&settings);

    let output = handle(&event, &settings, &formatter).map_err(|e| {
        error!(
            client = %event.client.name,
            check = %event.check.name,
            "Rejecting event: {}", e
        );
        e
    })?;

    serde_json::to_writer_pretty(io::stdout().lock(), &output)?;
    println!();
    Ok(())
}
