//! Secrets store behaviour

use chrono::{DateTime, Duration as ChronoDuration, SubsecRound, TimeZone, Utc};
use model_store::{
    CreateSecretParams, SecretUrl, SecretsFilter, SecretsStore, Store, UpdateSecretParams,
    models::*,
    secrets::Clock,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

struct FakeClock(Mutex<DateTime<Utc>>);

impl FakeClock {
    fn advance(&self, by: ChronoDuration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

struct Fixture {
    secrets: SecretsStore,
    clock: Arc<FakeClock>,
    model: ModelDoc,
}

async fn fixture() -> Fixture {
    let store = Store::in_memory();
    let model = ModelDoc {
        uuid: Uuid::new_v4(),
        name: "secrets".to_string(),
        model_type: ModelType::Iaas,
        owner: "admin".to_string(),
        config: Settings::new(),
        constraints: Constraints::default(),
        password_hash: String::new(),
        latest_tools_version: None,
        environ_version: 0,
        cloud: "dummy".to_string(),
        cloud_region: String::new(),
        cloud_credential: None,
        sla: Sla::default(),
        meter_status: MeterStatus::default(),
        controller_uuid: Uuid::new_v4(),
    };
    store.initialize_model(model.clone()).await.unwrap();
    let clock = Arc::new(FakeClock(Mutex::new(
        Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap(),
    )));
    Fixture {
        secrets: SecretsStore::with_clock(store, clock.clone()),
        clock,
        model,
    }
}

fn params(f: &Fixture, path: &str, data: &[(&str, &str)]) -> CreateSecretParams {
    CreateSecretParams {
        controller_uuid: f.model.controller_uuid.to_string(),
        model_uuid: f.model.uuid.to_string(),
        version: 1,
        provider_label: "juju".to_string(),
        secret_type: "blob".to_string(),
        path: path.to_string(),
        rotate_interval: Duration::from_secs(3600),
        data: data
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        ..Default::default()
    }
}

#[smol_potat::test]
async fn test_create_secret() {
    let f = fixture().await;
    let md = f
        .secrets
        .create_secret(params(&f, "app.password", &[("foo", "bar")]))
        .await
        .unwrap();

    assert_eq!(
        md.url.to_string(),
        format!(
            "secret://v1/{}/{}/app.password",
            f.model.controller_uuid, f.model.uuid
        )
    );
    assert_eq!(md.id, 1);
    assert_eq!(md.revision, 1);
    assert_eq!(md.rotate_interval, Duration::from_secs(3600));
    let now = f.clock.now().round_subsecs(0);
    assert_eq!(md.create_time, now);
    assert_eq!(md.update_time, now);

    let err = f
        .secrets
        .create_secret(params(&f, "app.password", &[("foo", "bar")]))
        .await
        .unwrap_err();
    assert!(err.is_already_exists());
}

#[smol_potat::test]
async fn test_create_increments_id() {
    let f = fixture().await;
    f.secrets
        .create_secret(params(&f, "app.password", &[("foo", "bar")]))
        .await
        .unwrap();
    let md = f
        .secrets
        .create_secret(params(&f, "app.password2", &[("foo", "bar")]))
        .await
        .unwrap();
    assert_eq!(md.id, 2);
    assert!(md.url.to_string().ends_with("/app.password2"));
}

#[smol_potat::test]
async fn test_get_value_not_found() {
    let f = fixture().await;
    let url: SecretUrl = "secret://v1/app.password".parse().unwrap();
    let err = f.secrets.get_secret_value(&url).await.unwrap_err();
    assert!(err.is_not_found());
}

#[smol_potat::test]
async fn test_get_value_attribute() {
    let f = fixture().await;
    let md = f
        .secrets
        .create_secret(params(&f, "app.password", &[("foo", "bar"), ("hello", "world")]))
        .await
        .unwrap();

    let value = f
        .secrets
        .get_secret_value(&md.url.with_revision(1).with_attribute("hello"))
        .await
        .unwrap();
    assert_eq!(
        value,
        BTreeMap::from([("hello".to_string(), "world".to_string())])
    );

    let err = f
        .secrets
        .get_secret_value(&md.url.with_revision(1).with_attribute("goodbye"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), r#"secret attribute "goodbye" not found"#);
}

#[smol_potat::test]
async fn test_update_nothing() {
    let f = fixture().await;
    let url = SecretUrl::new(1, "password");
    let err = f
        .secrets
        .update_secret(&url, UpdateSecretParams::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "must specify a new value or metadata to update a secret"
    );
}

#[smol_potat::test]
async fn test_update_rotate_interval_keeps_revision_and_data() {
    let f = fixture().await;
    let md = f
        .secrets
        .create_secret(params(&f, "app.password", &[("foo", "bar")]))
        .await
        .unwrap();
    f.clock.advance(ChronoDuration::hours(1));

    let updated = f
        .secrets
        .update_secret(
            &md.url.with_revision(0),
            UpdateSecretParams {
                rotate_interval: Some(Duration::from_secs(7200)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.revision, 1);
    assert_eq!(updated.rotate_interval, Duration::from_secs(7200));
    assert_eq!(updated.create_time, md.create_time);
    assert_eq!(updated.update_time, md.update_time + ChronoDuration::hours(1));

    let value = f.secrets.get_secret_value(&md.url).await.unwrap();
    assert_eq!(value, BTreeMap::from([("foo".to_string(), "bar".to_string())]));
}

#[smol_potat::test]
async fn test_update_data_creates_revision() {
    let f = fixture().await;
    let md = f
        .secrets
        .create_secret(params(&f, "app.password", &[("foo", "bar")]))
        .await
        .unwrap();
    let new_data = BTreeMap::from([
        ("foo".to_string(), "bar".to_string()),
        ("hello".to_string(), "world".to_string()),
    ]);

    let updated = f
        .secrets
        .update_secret(
            &md.url.with_revision(0),
            UpdateSecretParams {
                data: Some(new_data.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.revision, 2);
    assert_eq!(updated.rotate_interval, Duration::from_secs(3600));

    let latest = f.secrets.get_secret_value(&md.url.with_revision(0)).await.unwrap();
    assert_eq!(latest, new_data);
    let first = f.secrets.get_secret_value(&md.url.with_revision(1)).await.unwrap();
    assert_eq!(first, BTreeMap::from([("foo".to_string(), "bar".to_string())]));

    let list = f.secrets.list_secrets(&SecretsFilter::default()).await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].revision, 2);
    assert_eq!(f.secrets.revisions("app.password").await.unwrap().len(), 2);
}
