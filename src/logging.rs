use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Log file under the user data dir. The terminal belongs to the UI, so
/// nothing is ever written to stdout or stderr while it runs.
pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parla")
        .join("parla.log")
}

/// `RUST_LOG` wins over the configured level.
pub fn init(level: &str) -> Result<PathBuf> {
    let path = log_path();
    init_at(&path, level)?;
    Ok(path)
}

/// Install the global subscriber writing to `path`. Fails if a subscriber
/// is already installed.
pub fn init_at(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log dir {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing log subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_init_reports_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("parla.log");

        init_at(&path, "debug").unwrap();
        assert!(path.exists());
        tracing::info!("written after init");

        let err = init_at(&path, "debug").unwrap_err();
        assert!(format!("{err:#}").contains("installing log subscriber"));
    }
}
