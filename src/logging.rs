/// Diagnostics setup. The terminal UI owns stdout, so interactive sessions
/// log to a file; command-line subcommands log to stderr.
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const FILTER_VAR: &str = "SHIFTPLAN_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn default_log_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(data_dir) => data_dir.join("shiftplan").join("shiftplan.log"),
        None => PathBuf::from("shiftplan.log"),
    }
}

pub fn init_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::registry()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;
    Ok(())
}

pub fn init_stderr() -> Result<()> {
    tracing_subscriber::registry()
        .with(filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}
