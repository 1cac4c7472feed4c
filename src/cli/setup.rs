//! `setup` subcommand: writes the annotated example configuration.

use crate::core::config::AppConfig;
use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Writes the example configuration to `target`, or to the default config
/// path when none is given. An existing file is never overwritten.
/// Returns the path that was written.
pub fn setup(target: Option<&Path>) -> Result<PathBuf> {
    let path = match target {
        Some(path) => path.to_path_buf(),
        None => AppConfig::default_config_path()?,
    };

    write_example_config(&path)?;
    info!(path = %path.display(), "Created example configuration");
    Ok(path)
}

fn write_example_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    // `create_new` makes the existence check and the create a single step.
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => {
                anyhow!("Configuration file already exists at {}", path.display())
            }
            _ => anyhow!(e).context(format!("Failed to create {}", path.display())),
        })?;

    file.write_all(EXAMPLE_CONFIG.as_bytes())
        .with_context(|| format!("Failed to write config file to {}", path.display()))
}
