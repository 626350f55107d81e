//! `album_export`: downloads every post of one album into a text file.
//!
//! Reads `ALBUM_ID` and `AUTH_TOKEN` (plus optional settings) from the
//! environment or a `.env` file in the working directory.

use std::process::ExitCode;

use album_engine::{AlbumExporter, ExportConfig, ExportError};
use album_logging::{album_error, album_warn, LogDestination};
use log::LevelFilter;

const LOG_DESTINATION_KEY: &str = "LOG_DESTINATION";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // No .env file is fine; the variables may come from the shell.
    let _ = dotenvy::dotenv();

    let raw_destination = std::env::var(LOG_DESTINATION_KEY).ok();
    let parsed = raw_destination.as_deref().and_then(LogDestination::parse);
    let destination = parsed.unwrap_or_default();
    album_logging::initialize(destination, LevelFilter::Info);
    if let (Some(raw), None) = (raw_destination.as_deref(), parsed) {
        album_warn!("Ignoring unknown {}={:?}, logging to terminal", LOG_DESTINATION_KEY, raw);
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            album_error!("Error: {}", err);
            if destination == LogDestination::File {
                eprintln!("Error: {err}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Fetch, decode and write failures are reported by the exporter and still exit zero;
/// only setup errors reach the caller.
async fn run() -> Result<(), ExportError> {
    let config = ExportConfig::from_env()?;
    let report = AlbumExporter::new(config)?.run().await?;
    if report.failure.is_some() {
        album_warn!(
            "Partial export kept: {} posts written before the failure",
            report.posts_written
        );
    }
    Ok(())
}
