//! Ayurdx: symptom-based disease prediction with Ayurvedic recommendations.
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ayurdx::adapters::sanitize::RedactingMakeWriter;
use ayurdx::config::AppConfig;
use ayurdx::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Logging to the terminal would corrupt the TUI, so an interactive
    // session logs to a file unless told otherwise.
    let (writer, _guard) = if config.log_mode.use_file(std::io::stdout().is_terminal()) {
        if let Some(parent) = config.log_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(RedactingMakeWriter::new(writer)),
        )
        .init();

    tracing::info!("Starting Ayurdx...");
    config.log_warnings();

    let mut app = App::new(&config)?;
    app.run()?;

    tracing::info!("Ayurdx shutdown complete.");
    Ok(())
}
