use crate::open_store;
use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table};
use migration_config::Config;
use model_export::Snapshot;

/// Export the configured store and print what it holds
pub async fn run(config: &Config) -> Result<()> {
    let store = open_store(&config.store).await?;
    let snapshot = model_export::export(&store, &config.export)
        .await
        .context("Export failed")?;

    println!("Model: {} ({})", snapshot.model().name, snapshot.model().uuid);
    println!("{}", counts_table(&snapshot));

    if !snapshot.omissions().is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["ENTITY", "OMITTED"]);
        for omission in snapshot.omissions() {
            table.add_row(vec![
                Cell::new(&omission.entity),
                Cell::new(&omission.reason).fg(Color::Yellow),
            ]);
        }
        println!("{}", table);
    }

    if !snapshot.broken_references().is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["ENTITY", "FIELD", "MISSING"]);
        for broken in snapshot.broken_references() {
            table.add_row(vec![
                Cell::new(&broken.entity),
                Cell::new(&broken.field),
                Cell::new(&broken.target).fg(Color::Red),
            ]);
        }
        println!("{}", table);
    }

    Ok(())
}

/// Entity counts, one row per kind
pub fn counts_table(snapshot: &Snapshot) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ENTITY", "COUNT"]);
    for (kind, count) in snapshot.entity_counts() {
        let count_cell = if count == 0 {
            Cell::new(count).fg(Color::DarkGrey)
        } else {
            Cell::new(count)
        };
        table.add_row(vec![Cell::new(kind), count_cell]);
    }
    table
}
