use crate::open_store;
use anyhow::{Context, Result};
use migration_config::{Config, OutputFormat};
use model_export::Snapshot;
use std::path::Path;
use tracing::{info, warn};

/// Export the configured store and write the snapshot
pub async fn run(config: &Config, output: Option<&Path>, format: Option<OutputFormat>) -> Result<()> {
    let store = open_store(&config.store).await?;
    let snapshot = model_export::export(&store, &config.export)
        .await
        .context("Export failed")?;

    report(&snapshot);

    let format = format.unwrap_or(config.output.format);
    let rendered = render(&snapshot, format)?;

    match output.or(config.output.path.as_deref().map(Path::new)) {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} snapshot to {}", format, path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Serialize a snapshot in the requested format
pub fn render(snapshot: &Snapshot, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(snapshot)?,
        OutputFormat::Yaml => serde_yaml::to_string(snapshot)?,
    };
    Ok(rendered)
}

fn report(snapshot: &Snapshot) {
    info!(
        "Exported model {:?}: {} machines, {} applications, {} relations",
        snapshot.model().name,
        snapshot.all_machines().len(),
        snapshot.applications().len(),
        snapshot.relations().len()
    );
    if snapshot.is_incomplete() {
        warn!(
            "Snapshot is incomplete: {} omissions recorded",
            snapshot.omissions().len()
        );
    }
    if snapshot.is_partial() {
        warn!(
            "Snapshot is partial: {} broken references recorded",
            snapshot.broken_references().len()
        );
    }
}
