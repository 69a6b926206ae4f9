use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Send logs to `<data_dir>/paycheck.log`; the terminal belongs to the TUI.
/// `PAYCHECK_LOG` takes precedence over the configured level.
pub(crate) fn init(data_dir: &Path, default_level: &str) -> Result<()> {
    let path = data_dir.join("paycheck.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_env("PAYCHECK_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .try_init()
        .context("Failed to install log subscriber")?;
    Ok(())
}
