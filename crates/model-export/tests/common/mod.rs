//! Common test utilities

#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use model_store::{
    CreateSecretParams, SecretsStore, Store,
    models::*,
};
use serde_json::json;
use std::collections::BTreeMap;

/// A model with data in every optional category:
///
/// * machines `0` (hosting container `0/lxd/0`) and `1`, all provisioned
/// * `wordpress/0` on `0`, `mysql/0` on `1`, related through `db`
/// * space `db` with subnet `10.0.0.0/24`, device `eth0` and one address
/// * an offer of `mysql` with one connection, a storage volume, a secret,
///   an action, an operation and cloud image metadata
pub async fn populated_store() -> Store {
    let store = Store::in_memory();
    let mut model = ModelDoc::new("prod", "admin", "aws");
    model.cloud_region = "us-east-1".to_string();
    model.cloud_credential = Some("aws/admin/default".to_string());
    store.initialize_model(model.clone()).await.unwrap();
    store
        .put(&CloudCredentialDoc {
            cloud: "aws".to_string(),
            owner: "admin".to_string(),
            name: "default".to_string(),
            auth_type: "access-key".to_string(),
            attributes: BTreeMap::from([("access-key".to_string(), "AKIA".to_string())]),
        })
        .await
        .unwrap();
    store
        .set_annotations(global_key::MODEL, [("owner".to_string(), "ops".to_string())])
        .await
        .unwrap();
    store
        .put(&ModelUserDoc {
            name: "admin".to_string(),
            display_name: "Admin".to_string(),
            access: "admin".to_string(),
            created_by: "admin".to_string(),
            date_created: at(0),
            last_connection: None,
        })
        .await
        .unwrap();

    let db = store.add_space("db", "", false).await.unwrap();
    store
        .add_subnet(SubnetDoc {
            id: String::new(),
            cidr: "10.0.0.0/24".to_string(),
            provider_id: "subnet-1".to_string(),
            provider_network_id: String::new(),
            vlan_tag: 0,
            availability_zones: vec!["us-east-1a".to_string()],
            space_id: db.id.clone(),
            fan: None,
            is_public: false,
        })
        .await
        .unwrap();

    let mut host = MachineDoc::new("0", "focal");
    host.provider_addresses = vec![Address::local_cloud("10.0.0.5", Some(&db.id))];
    store.add_machine(host).await.unwrap();
    let mut container = MachineDoc::new("0/lxd/0", "focal");
    container.container_type = Some("lxd".to_string());
    store.add_machine(container).await.unwrap();
    store.add_machine(MachineDoc::new("1", "focal")).await.unwrap();
    for id in ["0", "0/lxd/0", "1"] {
        provision(&store, id).await;
    }
    store
        .put(&SshHostKeysDoc {
            machine_id: "0".to_string(),
            keys: vec!["ssh-ed25519 AAAA".to_string()],
        })
        .await
        .unwrap();

    for (app, machine) in [("wordpress", "0"), ("mysql", "1")] {
        let url: CharmUrl = format!("cs:focal/{app}-1").parse().unwrap();
        let mut doc = ApplicationDoc::new(app, "focal", url, CharmOrigin::new(OriginSource::CharmStore));
        doc.charm_config.insert("port".to_string(), json!(80));
        doc.endpoint_bindings.insert(String::new(), db.id.clone());
        store.add_application(doc).await.unwrap();
        let unit = format!("{app}/0");
        store
            .add_unit(UnitDoc::new(&unit, app, "focal", Some(machine)))
            .await
            .unwrap();
        store
            .put(&ToolsDoc {
                global_key: global_key::unit_agent(&unit),
                version: "2.9.0-ubuntu-amd64".to_string(),
                url: String::new(),
                sha256: "abc".to_string(),
                size: 1024,
            })
            .await
            .unwrap();
        store.claim_leadership(app, &unit).await.unwrap();
    }

    let relation = store
        .add_relation(vec![
            Endpoint::new("mysql", "server", Role::Provider, "mysql"),
            Endpoint::new("wordpress", "db", Role::Requirer, "mysql"),
        ])
        .await
        .unwrap();
    for unit in ["wordpress/0", "mysql/0"] {
        let settings = Settings::from([("ingress-address".to_string(), json!("10.0.0.5"))]);
        store.enter_scope(&relation.key, unit, settings).await.unwrap();
    }
    store
        .set_relation_app_settings(&relation.key, "mysql", Settings::from([("db".to_string(), json!("wp"))]))
        .await
        .unwrap();

    store
        .put(&LinkLayerDeviceDoc {
            machine_id: "0".to_string(),
            name: "eth0".to_string(),
            mtu: 1500,
            provider_id: String::new(),
            device_type: "ethernet".to_string(),
            mac_address: "00:16:3e:00:00:01".to_string(),
            is_auto_start: true,
            is_up: true,
            parent_name: String::new(),
        })
        .await
        .unwrap();
    store.put(&ip_address("0", "eth0", "10.0.0.5", "10.0.0.0/24")).await.unwrap();

    store
        .put(&ApplicationOfferDoc {
            offer_uuid: "offer-1".to_string(),
            offer_name: "hosted-mysql".to_string(),
            application_name: "mysql".to_string(),
            description: String::new(),
            endpoints: BTreeMap::from([("db".to_string(), "server".to_string())]),
            acl: BTreeMap::from([("admin".to_string(), "admin".to_string())]),
        })
        .await
        .unwrap();
    store
        .put(&OfferConnectionDoc {
            offer_uuid: "offer-1".to_string(),
            relation_id: relation.id,
            relation_key: relation.key.clone(),
            source_model_uuid: "consumer-model".to_string(),
            username: "bob".to_string(),
        })
        .await
        .unwrap();

    store
        .put(&StorageInstanceDoc {
            id: "data/0".to_string(),
            kind: StorageKind::Block,
            owner: Some(StorageOwner::Unit("wordpress/0".to_string())),
            attachments: vec!["wordpress/0".to_string()],
            constraints: StorageInstanceConstraints {
                pool: "ebs".to_string(),
                size: 1024,
            },
        })
        .await
        .unwrap();
    store
        .put(&VolumeDoc {
            id: "0".to_string(),
            storage_id: Some("data/0".to_string()),
            pool: "ebs".to_string(),
            size: 1024,
            info: None,
        })
        .await
        .unwrap();
    store
        .put(&VolumeAttachmentPlanDoc {
            volume_id: "0".to_string(),
            machine_id: "0".to_string(),
            device_type: DeviceType::Local,
            device_attributes: BTreeMap::new(),
            block_device: None,
        })
        .await
        .unwrap();

    SecretsStore::new(store.clone())
        .create_secret(CreateSecretParams {
            controller_uuid: model.controller_uuid.to_string(),
            model_uuid: model.uuid.to_string(),
            version: 1,
            secret_type: "blob".to_string(),
            path: "app/mysql/password".to_string(),
            data: BTreeMap::from([("password".to_string(), "c2VjcmV0".to_string())]),
            ..Default::default()
        })
        .await
        .unwrap();

    store
        .put(&OperationDoc {
            id: "1".to_string(),
            summary: "backup".to_string(),
            enqueued: at(10),
            started: None,
            completed: None,
            status: "pending".to_string(),
            complete_task_count: 0,
            spawned_task_count: 1,
            fail: String::new(),
        })
        .await
        .unwrap();
    store
        .put(&ActionDoc {
            id: "2".to_string(),
            receiver: "mysql/0".to_string(),
            name: "backup".to_string(),
            operation: "1".to_string(),
            parameters: Settings::new(),
            parallel: false,
            execution_group: String::new(),
            enqueued: at(10),
            started: None,
            completed: None,
            status: "pending".to_string(),
            message: String::new(),
            results: Settings::new(),
            logs: Vec::new(),
        })
        .await
        .unwrap();
    store
        .put(&CloudImageMetadataDoc {
            stream: "released".to_string(),
            region: "us-east-1".to_string(),
            version: "20.04".to_string(),
            arch: "amd64".to_string(),
            virt_type: "hvm".to_string(),
            root_storage_type: "ebs".to_string(),
            root_storage_size: None,
            source: "custom".to_string(),
            priority: 20,
            image_id: "ami-1".to_string(),
            date_created: at(0),
        })
        .await
        .unwrap();

    store
}

/// Relate `wordpress` to the remote application `gravy-rainbow`, offered
/// from another model with a single `private` space, and put `wordpress/0`
/// in scope. Also records the remote entity token, a firewall rule and the
/// relation's ingress networks.
pub async fn add_cross_model_relation(store: &Store) -> RelationDoc {
    store
        .put(&RemoteApplicationDoc {
            name: "gravy-rainbow".to_string(),
            offer_uuid: "offer-uuid".to_string(),
            url: "me/model.rainbow".to_string(),
            source_model_uuid: "offering-model".to_string(),
            external_controller_uuid: None,
            endpoints: vec![RemoteEndpoint {
                name: "db".to_string(),
                role: Role::Provider,
                interface: "mysql".to_string(),
            }],
            spaces: vec![RemoteSpace {
                cloud_type: "ec2".to_string(),
                name: "private".to_string(),
                provider_id: "juju-space-private".to_string(),
                provider_attributes: BTreeMap::from([(
                    "network".to_string(),
                    "network-1".to_string(),
                )]),
                subnets: vec![RemoteSubnet {
                    cidr: "1.2.4.0/24".to_string(),
                    provider_id: "juju-subnet-24".to_string(),
                    provider_network_id: "network-1".to_string(),
                    provider_space_id: "juju-space-private".to_string(),
                    vlan_tag: 0,
                    availability_zones: vec!["az1".to_string(), "az2".to_string()],
                }],
            }],
            bindings: BTreeMap::from([("db".to_string(), "private".to_string())]),
            is_consumer_proxy: false,
        })
        .await
        .unwrap();
    store
        .put(&RemoteEntityDoc {
            id: "application-gravy-rainbow".to_string(),
            token: "charisma".to_string(),
            macaroon: String::new(),
        })
        .await
        .unwrap();

    let relation = store
        .add_relation(vec![
            Endpoint::new("gravy-rainbow", "db", Role::Provider, "mysql"),
            Endpoint::new("wordpress", "db", Role::Requirer, "mysql"),
        ])
        .await
        .unwrap();
    store
        .enter_scope(
            &relation.key,
            "wordpress/0",
            Settings::from([("name".to_string(), json!("wordpress/0"))]),
        )
        .await
        .unwrap();

    store
        .put(&FirewallRuleDoc {
            service: WellKnownService::JujuApplicationOffer,
            whitelist_cidrs: vec!["1.2.4.0/24".to_string()],
        })
        .await
        .unwrap();
    store
        .put(&RelationNetworksDoc {
            relation_key: relation.key.clone(),
            direction: NetworkDirection::Ingress,
            cidrs: vec!["1.2.4.0/24".to_string()],
        })
        .await
        .unwrap();
    relation
}

/// Instance data and agent binaries for a machine
pub async fn provision(store: &Store, id: &str) {
    store
        .set_instance_data(InstanceDataDoc {
            machine_id: id.to_string(),
            instance_id: format!("i-{}", id.replace('/', "-")),
            arch: Some("amd64".to_string()),
            mem: Some(4096),
            root_disk: None,
            cpu_cores: Some(2),
            cpu_power: None,
            tags: None,
            availability_zone: Some("us-east-1a".to_string()),
            charm_profiles: Vec::new(),
        })
        .await
        .unwrap();
    store
        .put(&ToolsDoc {
            global_key: global_key::machine(id),
            version: "2.9.0-ubuntu-amd64".to_string(),
            url: String::new(),
            sha256: "abc".to_string(),
            size: 2048,
        })
        .await
        .unwrap();
}

/// A static address on a device
pub fn ip_address(machine: &str, device: &str, value: &str, cidr: &str) -> IpAddressDoc {
    IpAddressDoc {
        machine_id: machine.to_string(),
        device_name: device.to_string(),
        value: value.to_string(),
        subnet_cidr: cidr.to_string(),
        config_method: "static".to_string(),
        provider_id: String::new(),
        dns_servers: Vec::new(),
        dns_search_domains: Vec::new(),
        gateway_address: String::new(),
        origin: "provider".to_string(),
    }
}

/// A fixed point in time, `minutes` after the fixture epoch
pub fn at(minutes: i64) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
}
