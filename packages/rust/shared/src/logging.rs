//! Per-invocation logging setup: console plus a dated run log file.
//!
//! Each stage invocation constructs its own subscriber rather than relying
//! on an ambient process-wide logger. The file sink appends to
//! `<root>/log/<date>/<date>.log`; the console sink honors `RUST_LOG` and
//! the CLI verbosity flags.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{ReachoutError, Result};

/// Initialize tracing for one stage invocation.
///
/// `verbosity` maps to the console/file level: 0 → info, 1 → debug,
/// 2+ → trace. A `RUST_LOG` value overrides the computed filter.
pub fn init(root: &Path, verbosity: u8) -> Result<()> {
    let date = Local::now().format("%Y%m%d").to_string();
    let log_dir = root.join("log").join(&date);
    std::fs::create_dir_all(&log_dir).map_err(|e| ReachoutError::io(&log_dir, e))?;

    let log_path = log_dir.join(format!("{date}.log"));
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| ReachoutError::io(&log_path, e))?;

    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let console_layer = fmt::layer().with_target(false);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
