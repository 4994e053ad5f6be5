use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use trade_engine::cycle::IDLE_TARGET;

pub const FULL_LOG: &str = "trade_all.log";
pub const TRADE_LOG: &str = "trade.log";

fn append(path: &Path) -> Result<File, anyhow::Error> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))
}

/// Terminal output plus two log files: every line goes to `trade_all.log`,
/// and `trade.log` drops the idle decision lines.
pub fn init(log_dir: &Path) -> Result<(), anyhow::Error> {
    fs::create_dir_all(log_dir).with_context(|| format!("creating {}", log_dir.display()))?;
    let full = append(&log_dir.join(FULL_LOG))?;
    let trades = append(&log_dir.join(TRADE_LOG))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(full)))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(trades))
                .with_filter(filter_fn(|meta| meta.target() != IDLE_TARGET)),
        )
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}
