//! Log output for the TUI.
//!
//! The terminal belongs to the drill screen, so log lines go to a file instead of
//! stderr. `RUST_LOG` takes precedence over the level passed on the command line.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{HomerowError, Result};

pub const DEFAULT_LEVEL: &str = "info";

/// Install the global subscriber, appending to `path`. Call once at startup.
pub fn init_file_logging(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .try_init()
        .map_err(|_| HomerowError::LoggingInit)
}
