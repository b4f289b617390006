use crate::default_store_path;
use anyhow::Result;
use migration_config::Config;
use model_export::Category;
use std::path::Path;

/// Report a configuration that has already been parsed and validated
pub fn run(config_path: Option<&Path>, config: &Config) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating {}...", path.display()),
        None => println!("No configuration file given, checking defaults..."),
    }

    println!("✓ Configuration valid");
    println!("  Version: {}", config.version);

    if let Some(name) = &config.name {
        println!("  Name: {}", name);
    }

    let store = if config.store.in_memory {
        "in-memory".to_string()
    } else {
        config
            .store
            .path
            .clone()
            .unwrap_or_else(|| default_store_path().display().to_string())
    };
    println!("  Store: {}", store);
    println!(
        "  Output: {} to {}",
        config.output.format,
        config.output.path.as_deref().unwrap_or("stdout")
    );

    let skipped: Vec<&str> = Category::ALL
        .iter()
        .filter(|c| config.export.skips(**c))
        .map(|c| c.name())
        .collect();
    if skipped.is_empty() {
        println!("  Skipped: none");
    } else {
        println!("  Skipped: {}", skipped.join(", "));
    }

    if config.export.ignore_incomplete_model {
        println!("  ⚠ Incomplete model data will be recorded instead of failing the export");
    }

    Ok(())
}
