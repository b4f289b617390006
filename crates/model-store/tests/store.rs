//! Store behaviour across both backends

use chrono::Utc;
use model_store::{Collection, SledBackend, Store, models::*};
use tempfile::tempdir;
use uuid::Uuid;

fn model() -> ModelDoc {
    ModelDoc {
        uuid: Uuid::new_v4(),
        name: "store".to_string(),
        model_type: ModelType::Iaas,
        owner: "admin".to_string(),
        config: Settings::new(),
        constraints: Constraints::default(),
        password_hash: String::new(),
        latest_tools_version: Some("2.9.0".to_string()),
        environ_version: 0,
        cloud: "dummy".to_string(),
        cloud_region: "dummy-region".to_string(),
        cloud_credential: None,
        sla: Sla::default(),
        meter_status: MeterStatus::default(),
        controller_uuid: Uuid::new_v4(),
    }
}

async fn populate(store: &Store) -> RelationDoc {
    store.initialize_model(model()).await.unwrap();
    store.add_machine(MachineDoc::new("0", "focal")).await.unwrap();
    store.add_machine(MachineDoc::new("1", "focal")).await.unwrap();

    for (app, machine) in [("wordpress", "0"), ("mysql", "1")] {
        let url: CharmUrl = format!("cs:focal/{app}-1").parse().unwrap();
        store
            .add_application(ApplicationDoc::new(
                app,
                "focal",
                url,
                CharmOrigin::new(OriginSource::CharmStore),
            ))
            .await
            .unwrap();
        store
            .add_unit(UnitDoc::new(format!("{app}/0"), app, "focal", Some(machine)))
            .await
            .unwrap();
    }

    let relation = store
        .add_relation(vec![
            Endpoint::new("mysql", "server", Role::Provider, "mysql"),
            Endpoint::new("wordpress", "db", Role::Requirer, "mysql"),
        ])
        .await
        .unwrap();
    store
        .enter_scope(&relation.key, "wordpress/0", Settings::new())
        .await
        .unwrap();
    store
        .enter_scope(&relation.key, "mysql/0", Settings::new())
        .await
        .unwrap();
    relation
}

#[smol_potat::test]
async fn test_enter_scope_counts_units_once() {
    let store = Store::in_memory();
    let relation = populate(&store).await;

    store
        .enter_scope(&relation.key, "mysql/0", Settings::new())
        .await
        .unwrap();

    let stored: RelationDoc = store.fetch(&relation.key).await.unwrap();
    assert_eq!(stored.key, "wordpress:db mysql:server");
    assert_eq!(stored.unit_count, 2);
    assert_eq!(store.relation_scopes(stored.id).await.unwrap().len(), 2);
}

#[smol_potat::test]
async fn test_enter_scope_rejects_foreign_unit() {
    let store = Store::in_memory();
    let relation = populate(&store).await;
    let err = store
        .enter_scope(&relation.key, "haproxy/0", Settings::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not part of relation"));
}

#[smol_potat::test]
async fn test_unit_requires_application() {
    let store = Store::in_memory();
    store.initialize_model(model()).await.unwrap();
    let err = store
        .add_unit(UnitDoc::new("ghost/0", "ghost", "focal", None))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[smol_potat::test]
async fn test_volume_attachment_plan_block_device() {
    let store = Store::in_memory();
    populate(&store).await;
    store
        .put(&VolumeAttachmentPlanDoc {
            volume_id: "0/0".to_string(),
            machine_id: "0".to_string(),
            device_type: DeviceType::Iscsi,
            device_attributes: Default::default(),
            block_device: None,
        })
        .await
        .unwrap();

    let plan: VolumeAttachmentPlanDoc = store.fetch("0/0#0").await.unwrap();
    assert!(plan.block_device.is_none());

    store
        .set_volume_attachment_plan_block_device(
            "0/0",
            "0",
            PlanBlockDevice {
                device_name: "sdb".to_string(),
                device_links: vec![],
                hardware_id: String::new(),
                wwn: String::new(),
                bus_address: String::new(),
                size: 1024,
            },
        )
        .await
        .unwrap();
    let plan: VolumeAttachmentPlanDoc = store.fetch("0/0#0").await.unwrap();
    assert_eq!(plan.block_device.unwrap().device_name, "sdb");
}

#[smol_potat::test]
async fn test_sled_store_persists_documents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.db");

    {
        let store = Store::open(&path).await.unwrap();
        populate(&store).await;
        store
            .set_status("u#wordpress/0", Status::Active, "ready", Settings::new(), Utc::now())
            .await
            .unwrap();
    }

    let store = Store::with_backend(SledBackend::new(&path).await.unwrap());
    assert_eq!(store.all::<UnitDoc>().await.unwrap().len(), 2);
    assert_eq!(store.leader("wordpress").await.unwrap(), None);
    assert!(store.has_collection(Collection::Relations).await.unwrap());
    let status = store.status("u#wordpress/0").await.unwrap().unwrap();
    assert_eq!(status.message, "ready");
}
