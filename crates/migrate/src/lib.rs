//! Model migration CLI
//!
//! Library half of the `migrate` binary: the subcommands, store opening,
//! logging setup and the demonstration model used by `seed-demo`.

pub mod commands;
pub mod demo;
pub mod logging;

use anyhow::{Context, Result};
use migration_config::{Config, StoreConfig, parser};
use model_store::Store;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load the configuration file, or the defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => parser::parse_file(path)
            .with_context(|| format!("Failed to parse configuration {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Per-user store location used when the configuration names none
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("model-migration")
        .join("store")
}

/// Open the store a configuration points at
pub async fn open_store(config: &StoreConfig) -> Result<Store> {
    if config.in_memory {
        debug!("Using in-memory store");
        return Ok(Store::in_memory());
    }

    let path = config
        .path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_store_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    debug!("Opening store at {}", path.display());
    Store::open(&path)
        .await
        .with_context(|| format!("Failed to open store at {}", path.display()))
}
