use crate::{demo, open_store};
use anyhow::{Context, Result};
use migration_config::Config;

/// Seed the demonstration model into the configured store
pub async fn run(config: &Config) -> Result<()> {
    if config.store.in_memory {
        anyhow::bail!("Refusing to seed an in-memory store; nothing would be kept");
    }

    let store = open_store(&config.store).await?;
    demo::seed(&store)
        .await
        .context("Failed to seed demonstration model")?;

    let model = store.model().await?;
    println!("✓ Seeded model {:?} ({})", model.name, model.uuid);
    Ok(())
}
