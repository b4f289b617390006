//! End-to-end export of a populated model

mod common;

use chrono::{Duration, Utc};
use common::{ip_address, populated_store};
use model_export::{Category, ExportConfig, FORMAT_VERSION, STATUS_HISTORY_CAP, export};
use model_store::{SledBackend, Store, models::*};
use std::collections::BTreeSet;
use tempfile::tempdir;

#[smol_potat::test]
async fn test_export_populated_model() {
    let store = populated_store().await;
    let snapshot = export(&store, &ExportConfig::default()).await.unwrap();

    assert_eq!(snapshot.format_version(), FORMAT_VERSION);
    assert!(!snapshot.is_incomplete());
    assert!(!snapshot.is_partial());
    assert_eq!(snapshot.model().name, "prod");
    assert_eq!(snapshot.model().cloud_credential.as_ref().unwrap().name, "default");

    let hosts: Vec<&str> = snapshot.machines().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(hosts, vec!["0", "1"]);
    assert_eq!(snapshot.machines()[0].containers[0].id, "0/lxd/0");
    assert_eq!(snapshot.all_machines().len(), 3);

    let mysql = snapshot
        .applications()
        .iter()
        .find(|a| a.name == "mysql")
        .unwrap();
    assert_eq!(mysql.leader.as_deref(), Some("mysql/0"));
    assert_eq!(mysql.units.len(), 1);
    assert_eq!(mysql.offers[0].offer_name, "hosted-mysql");
    assert!(mysql.units[0].tools.is_some());

    assert_eq!(snapshot.secrets().len(), 1);
    assert_eq!(snapshot.secrets()[0].revisions.len(), 1);
    assert_eq!(snapshot.offer_connections().len(), 1);
    assert_eq!(snapshot.sequences().get("relation"), Some(&1));
}

#[smol_potat::test]
async fn test_relation_endpoints_count_units_in_scope() {
    let store = populated_store().await;
    let snapshot = export(&store, &ExportConfig::default()).await.unwrap();

    let relation = &snapshot.relations()[0];
    assert_eq!(relation.key, "wordpress:db mysql:server");
    assert_eq!(relation.endpoints.len(), 2);
    for ep in &relation.endpoints {
        assert_eq!(ep.unit_count(), 1);
        let unit = format!("{}/0", ep.application_name);
        assert!(ep.unit_settings.contains_key(&unit), "{unit}");
    }
    let mysql = relation
        .endpoints
        .iter()
        .find(|ep| ep.application_name == "mysql")
        .unwrap();
    assert_eq!(mysql.application_settings["db"], "wp");
}

#[smol_potat::test]
async fn test_subnets_and_addresses_resolve_to_exported_spaces() {
    let store = populated_store().await;
    store
        .put(&ip_address("1", "eth1", "10.0.0.9", "10.0.0.0/24"))
        .await
        .unwrap();
    let config = ExportConfig::skipping([Category::LinkLayerDevices]);
    let snapshot = export(&store, &config).await.unwrap();

    let spaces: BTreeSet<&str> = snapshot.spaces().iter().map(|s| s.id.as_str()).collect();
    assert!(spaces.contains(DEFAULT_SPACE_ID));
    for subnet in snapshot.subnets() {
        assert!(spaces.contains(subnet.space_id.as_str()), "{}", subnet.cidr);
    }
    assert_eq!(snapshot.ip_addresses().len(), 2);
    for address in snapshot.ip_addresses() {
        assert!(spaces.contains(address.space_id.as_str()), "{}", address.value);
        assert_eq!(address.space_id, "1");
    }
}

#[smol_potat::test]
async fn test_status_history_is_capped_newest_first() {
    let store = populated_store().await;
    let key = global_key::machine("1");
    // After the pending status recorded when the machine was added.
    let base = Utc::now() + Duration::hours(1);
    for i in 0..30 {
        store
            .set_status(&key, Status::Started, &format!("step {i}"), Settings::new(), base + Duration::minutes(i))
            .await
            .unwrap();
    }

    let snapshot = export(&store, &ExportConfig::default()).await.unwrap();
    let machine = snapshot.all_machines().into_iter().find(|m| m.id == "1").unwrap();
    assert_eq!(machine.status_history.len(), STATUS_HISTORY_CAP);
    assert_eq!(machine.status_history[0].message, "step 29");
    assert_eq!(machine.status_history[19].message, "step 10");
    assert_eq!(machine.status.as_ref().unwrap().message, "step 29");

    let skipped = export(&store, &ExportConfig::skipping([Category::StatusHistory]))
        .await
        .unwrap();
    let machine = skipped.all_machines().into_iter().find(|m| m.id == "1").unwrap();
    assert!(machine.status_history.is_empty());
    assert_eq!(machine.status.as_ref().unwrap().message, "step 29");
}

#[smol_potat::test]
async fn test_attachment_plan_block_device_absent_until_reported() {
    let store = populated_store().await;
    let snapshot = export(&store, &ExportConfig::default()).await.unwrap();
    assert!(snapshot.volumes()[0].attachment_plans[0].block_device.is_none());

    store
        .set_volume_attachment_plan_block_device(
            "0",
            "0",
            PlanBlockDevice {
                device_name: "sdb".to_string(),
                device_links: Vec::new(),
                hardware_id: String::new(),
                wwn: String::new(),
                bus_address: String::new(),
                size: 1024,
            },
        )
        .await
        .unwrap();
    let snapshot = export(&store, &ExportConfig::default()).await.unwrap();
    let device = snapshot.volumes()[0].attachment_plans[0]
        .block_device
        .as_ref()
        .unwrap();
    assert_eq!(device.device_name, "sdb");
}

#[smol_potat::test]
async fn test_export_is_idempotent() {
    let store = populated_store().await;
    let first = export(&store, &ExportConfig::default()).await.unwrap();
    let second = export(&store, &ExportConfig::default()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[smol_potat::test]
async fn test_export_from_sled_store() {
    let dir = tempdir().unwrap();
    let store = Store::with_backend(SledBackend::new(dir.path()).await.unwrap());
    store
        .initialize_model(ModelDoc::new("persisted", "admin", "lxd"))
        .await
        .unwrap();
    store.add_machine(MachineDoc::new("0", "jammy")).await.unwrap();
    common::provision(&store, "0").await;

    let snapshot = export(&store, &ExportConfig::default()).await.unwrap();
    let yaml = serde_yaml::to_string(&snapshot).unwrap();
    let restored: model_export::Snapshot = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(restored.machines()[0].id, "0");
    assert_eq!(restored.model().name, "persisted");
}

#[smol_potat::test]
async fn test_charm_origin_without_risk_tracks_stable() {
    let store = populated_store().await;
    let mut wordpress = store
        .get::<ApplicationDoc>("wordpress")
        .await
        .unwrap()
        .unwrap();
    wordpress.charm_origin.channel = Some(Channel::default());
    store.put(&wordpress).await.unwrap();

    let snapshot = export(&store, &ExportConfig::default()).await.unwrap();
    let origin = |name: &str| {
        snapshot
            .applications()
            .iter()
            .find(|a| a.name == name)
            .unwrap()
            .charm_origin
            .clone()
    };
    let channel = origin("wordpress").channel.unwrap();
    assert_eq!(channel.risk, Channel::STABLE);
    assert_eq!(channel.to_string(), "stable");
    assert_eq!(origin("mysql").channel, None);
}
