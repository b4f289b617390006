//! Demonstration model
//!
//! Two machines running `wordpress` and `mysql`, related over `db`, with
//! one space and subnet so every exported reference resolves.

use chrono::Utc;
use model_store::{Result, Store, models::*};
use serde_json::json;
use tracing::info;

const AGENT_VERSION: &str = "2.9.0-ubuntu-amd64";

/// Write the demonstration model into an empty store
pub async fn seed(store: &Store) -> Result<()> {
    let mut model = ModelDoc::new("demo", "admin", "localhost");
    model.cloud_region = "localhost".to_string();
    store.initialize_model(model).await?;
    store
        .put(&ModelUserDoc {
            name: "admin".to_string(),
            display_name: "Administrator".to_string(),
            access: "admin".to_string(),
            created_by: "admin".to_string(),
            date_created: Utc::now(),
            last_connection: None,
        })
        .await?;

    let space = store.add_space("internal", "", false).await?;
    let subnet = store
        .add_subnet(SubnetDoc {
            id: String::new(),
            cidr: "10.10.0.0/24".to_string(),
            provider_id: String::new(),
            provider_network_id: String::new(),
            vlan_tag: 0,
            availability_zones: Vec::new(),
            space_id: space.id.clone(),
            fan: None,
            is_public: false,
        })
        .await?;

    for (id, address) in [("0", "10.10.0.10"), ("1", "10.10.0.11")] {
        let mut machine = MachineDoc::new(id, "focal");
        machine.provider_addresses = vec![Address::local_cloud(address, Some(&space.id))];
        store.add_machine(machine).await?;
        store
            .set_instance_data(InstanceDataDoc {
                machine_id: id.to_string(),
                instance_id: format!("juju-demo-{id}"),
                arch: Some("amd64".to_string()),
                mem: Some(2048),
                root_disk: Some(8192),
                cpu_cores: Some(1),
                cpu_power: None,
                tags: None,
                availability_zone: None,
                charm_profiles: Vec::new(),
            })
            .await?;
        store.put(&tools(global_key::machine(id))).await?;
        store
            .put(&LinkLayerDeviceDoc {
                machine_id: id.to_string(),
                name: "eth0".to_string(),
                mtu: 1500,
                provider_id: String::new(),
                device_type: "ethernet".to_string(),
                mac_address: format!("00:16:3e:00:00:0{id}"),
                is_auto_start: true,
                is_up: true,
                parent_name: String::new(),
            })
            .await?;
        store
            .put(&IpAddressDoc {
                machine_id: id.to_string(),
                device_name: "eth0".to_string(),
                value: address.to_string(),
                subnet_cidr: subnet.cidr.clone(),
                config_method: "static".to_string(),
                provider_id: String::new(),
                dns_servers: Vec::new(),
                dns_search_domains: Vec::new(),
                gateway_address: "10.10.0.1".to_string(),
                origin: "machine".to_string(),
            })
            .await?;
    }

    for (app, machine) in [("wordpress", "0"), ("mysql", "1")] {
        let url: CharmUrl = format!("cs:focal/{app}-1").parse()?;
        let mut application =
            ApplicationDoc::new(app, "focal", url, CharmOrigin::new(OriginSource::CharmStore));
        application.endpoint_bindings.insert(String::new(), space.id.clone());
        store.add_application(application).await?;

        let unit = format!("{app}/0");
        store
            .add_unit(UnitDoc::new(&unit, app, "focal", Some(machine)))
            .await?;
        store.put(&tools(global_key::unit_agent(&unit))).await?;
        store.claim_leadership(app, &unit).await?;
    }

    let relation = store
        .add_relation(vec![
            Endpoint::new("mysql", "server", Role::Provider, "mysql"),
            Endpoint::new("wordpress", "db", Role::Requirer, "mysql"),
        ])
        .await?;
    for (unit, address) in [("wordpress/0", "10.10.0.10"), ("mysql/0", "10.10.0.11")] {
        let settings = Settings::from([("ingress-address".to_string(), json!(address))]);
        store.enter_scope(&relation.key, unit, settings).await?;
    }

    info!("Seeded demonstration model with relation {}", relation.key);
    Ok(())
}

fn tools(global_key: String) -> ToolsDoc {
    ToolsDoc {
        global_key,
        version: AGENT_VERSION.to_string(),
        url: String::new(),
        sha256: String::new(),
        size: 0,
    }
}
