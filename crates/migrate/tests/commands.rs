//! End-to-end runs of the CLI commands against an on-disk store

use migrate::{commands, demo, load_config, open_store};
use migration_config::{Config, OutputFormat, StoreConfig};
use model_export::Snapshot;
use std::io::Write;
use tempfile::TempDir;

fn config_for(dir: &TempDir) -> Config {
    Config {
        store: StoreConfig {
            path: Some(dir.path().join("store").display().to_string()),
            in_memory: false,
        },
        ..Config::default()
    }
}

#[smol_potat::test]
async fn test_seed_then_export_to_file() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir);

    commands::seed_demo::run(&config).await.unwrap();

    let output = dir.path().join("snapshot.yaml");
    commands::export::run(&config, Some(&output), Some(OutputFormat::Yaml))
        .await
        .unwrap();

    let snapshot: Snapshot = serde_yaml::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(snapshot.model().name, "demo");
    assert_eq!(snapshot.machines().len(), 2);
    assert_eq!(snapshot.applications().len(), 2);
    assert_eq!(snapshot.relations().len(), 1);
    assert_eq!(snapshot.ip_addresses().len(), 2);
    assert!(!snapshot.is_partial());
    assert!(!snapshot.is_incomplete());
}

#[smol_potat::test]
async fn test_seeding_twice_fails() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir);

    commands::seed_demo::run(&config).await.unwrap();
    assert!(commands::seed_demo::run(&config).await.is_err());
}

#[smol_potat::test]
async fn test_in_memory_store_cannot_be_seeded() {
    let config = Config {
        store: StoreConfig {
            path: None,
            in_memory: true,
        },
        ..Config::default()
    };
    let err = commands::seed_demo::run(&config).await.unwrap_err();
    assert!(err.to_string().contains("in-memory"));
}

#[smol_potat::test]
async fn test_export_of_empty_store_fails() {
    let config = Config {
        store: StoreConfig {
            path: None,
            in_memory: true,
        },
        ..Config::default()
    };
    let err = commands::export::run(&config, None, None).await.unwrap_err();
    assert_eq!(err.to_string(), "Export failed");
}

#[smol_potat::test]
async fn test_json_and_yaml_render_the_same_snapshot() {
    let store = model_store::Store::in_memory();
    demo::seed(&store).await.unwrap();
    let snapshot = model_export::export(&store, &Default::default()).await.unwrap();

    let json = commands::export::render(&snapshot, OutputFormat::Json).unwrap();
    let yaml = commands::export::render(&snapshot, OutputFormat::Yaml).unwrap();

    let from_json: Snapshot = serde_json::from_str(&json).unwrap();
    let from_yaml: Snapshot = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(from_json, from_yaml);
}

#[smol_potat::test]
async fn test_counts_table_lists_every_kind() {
    let store = model_store::Store::in_memory();
    demo::seed(&store).await.unwrap();
    let snapshot = model_export::export(&store, &Default::default()).await.unwrap();

    let table = commands::summary::counts_table(&snapshot).to_string();
    for (kind, _) in snapshot.entity_counts() {
        assert!(table.contains(kind), "missing {kind}");
    }
}

#[smol_potat::test]
async fn test_config_file_drives_store_and_toggles() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("migration.yaml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(
        file,
        "version: \"1.0\"\nstore:\n  path: \"{}\"\nexport:\n  skip_ip_addresses: true",
        dir.path().join("store").display()
    )
    .unwrap();

    let config = load_config(Some(&config_path)).unwrap();
    commands::validate::run(Some(&config_path), &config).unwrap();
    commands::seed_demo::run(&config).await.unwrap();

    let store = open_store(&config.store).await.unwrap();
    let snapshot = model_export::export(&store, &config.export).await.unwrap();
    assert!(snapshot.ip_addresses().is_empty());
    assert_eq!(snapshot.machines().len(), 2);
}

#[test]
fn test_missing_config_file() {
    let err = load_config(Some(std::path::Path::new("/nonexistent/migration.yaml"))).unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse configuration"));
}
