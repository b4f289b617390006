//! Secrets stored alongside the model
//!
//! A secret is identified by a [`SecretUrl`]; its metadata lives in one
//! document and every value it ever had lives in an immutable revision
//! document. Updating the value creates a new revision; updating only
//! metadata touches neither revision nor data.

use crate::{
    collection::Collection,
    error::{Error, Result},
    models::Document,
    store::Store,
};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const SCHEME: &str = "secret://";

/// Secret URL: `secret://v<version>/[<controller>/<model>/]<path>[/<revision>][#<attribute>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretUrl {
    /// Secret format version
    pub version: u32,
    /// Controller UUID, for fully qualified URLs
    pub controller_uuid: Option<String>,
    /// Model UUID, for fully qualified URLs
    pub model_uuid: Option<String>,
    /// Secret path, e.g. `app.password`
    pub path: String,
    /// Revision; 0 means the latest
    pub revision: u64,
    /// Single attribute to select from the value
    pub attribute: Option<String>,
}

impl SecretUrl {
    /// A URL without controller or model qualification
    pub fn new(version: u32, path: impl Into<String>) -> Self {
        Self {
            version,
            controller_uuid: None,
            model_uuid: None,
            path: path.into(),
            revision: 0,
            attribute: None,
        }
    }

    /// Same URL pointing at `revision`
    pub fn with_revision(&self, revision: u64) -> Self {
        Self {
            revision,
            ..self.clone()
        }
    }

    /// Same URL selecting `attribute`
    pub fn with_attribute(&self, attribute: impl Into<String>) -> Self {
        Self {
            attribute: Some(attribute.into()),
            ..self.clone()
        }
    }

    /// URL identifying the secret itself, without revision or attribute
    pub fn id(&self) -> String {
        Self {
            revision: 0,
            attribute: None,
            ..self.clone()
        }
        .to_string()
    }
}

impl fmt::Display for SecretUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}v{}/", self.version)?;
        if let (Some(controller), Some(model)) = (&self.controller_uuid, &self.model_uuid) {
            write!(f, "{controller}/{model}/")?;
        }
        f.write_str(&self.path)?;
        if self.revision > 0 {
            write!(f, "/{}", self.revision)?;
        }
        if let Some(attribute) = &self.attribute {
            write!(f, "#{attribute}")?;
        }
        Ok(())
    }
}

impl FromStr for SecretUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bad = |reason: &str| Error::invalid("secret URL", format!("{s:?}: {reason}"));

        let rest = s.strip_prefix(SCHEME).ok_or_else(|| bad("missing secret:// scheme"))?;
        let (rest, attribute) = match rest.split_once('#') {
            Some((rest, attr)) if !attr.is_empty() => (rest, Some(attr.to_string())),
            Some(_) => return Err(bad("empty attribute")),
            None => (rest, None),
        };

        let mut parts: Vec<&str> = rest.split('/').collect();
        let version = parts
            .first()
            .and_then(|v| v.strip_prefix('v'))
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or_else(|| bad("missing version"))?;
        parts.remove(0);

        let (controller_uuid, model_uuid) = if parts.len() >= 3
            && uuid::Uuid::parse_str(parts[0]).is_ok()
            && uuid::Uuid::parse_str(parts[1]).is_ok()
        {
            let qualified = (Some(parts[0].to_string()), Some(parts[1].to_string()));
            parts.drain(..2);
            qualified
        } else {
            (None, None)
        };

        let revision = match parts.as_slice() {
            [_, rev] => rev.parse::<u64>().map_err(|_| bad("bad revision"))?,
            [_] => 0,
            _ => return Err(bad("malformed path")),
        };
        let path = parts[0];
        if path.is_empty() {
            return Err(bad("empty path"));
        }

        Ok(Self {
            version,
            controller_uuid,
            model_uuid,
            path: path.to_string(),
            revision,
            attribute,
        })
    }
}

impl TryFrom<String> for SecretUrl {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SecretUrl> for String {
    fn from(url: SecretUrl) -> Self {
        url.to_string()
    }
}

/// Stored secret metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretDoc {
    /// Numeric id from the `secret` sequence
    pub id: u64,
    /// Secret path
    pub path: String,
    /// Format version
    pub version: u32,
    /// Controller UUID
    pub controller_uuid: String,
    /// Model UUID
    pub model_uuid: String,
    /// Secret type, e.g. `blob`
    pub secret_type: String,
    /// Provider label
    #[serde(default)]
    pub provider: String,
    /// Provider-side id
    #[serde(default)]
    pub provider_id: String,
    /// Rotation interval
    pub rotate_interval: Duration,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Tags
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Provider parameters
    #[serde(default)]
    pub params: BTreeMap<String, serde_json::Value>,
    /// Latest revision
    pub revision: u64,
    /// Creation time
    pub create_time: DateTime<Utc>,
    /// Last update time
    pub update_time: DateTime<Utc>,
}

impl Document for SecretDoc {
    const COLLECTION: Collection = Collection::Secrets;
    const KIND: &'static str = "secret";

    fn key(&self) -> String {
        self.path.clone()
    }
}

/// One immutable value of a secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRevisionDoc {
    /// Secret path
    pub path: String,
    /// Revision number, starting at 1
    pub revision: u64,
    /// Encoded values
    pub data: BTreeMap<String, String>,
    /// When the revision was created
    pub create_time: DateTime<Utc>,
}

impl SecretRevisionDoc {
    /// Key prefix covering every revision of a secret
    pub fn prefix(path: &str) -> String {
        format!("{path}/")
    }
}

impl Document for SecretRevisionDoc {
    const COLLECTION: Collection = Collection::SecretRevisions;
    const KIND: &'static str = "secret revision";

    fn key(&self) -> String {
        format!("{}{:010}", Self::prefix(&self.path), self.revision)
    }
}

/// Secret metadata as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretMetadata {
    /// Fully qualified URL
    pub url: SecretUrl,
    /// Secret path
    pub path: String,
    /// Format version
    pub version: u32,
    /// Rotation interval
    pub rotate_interval: Duration,
    /// Description
    pub description: String,
    /// Tags
    pub tags: BTreeMap<String, String>,
    /// Numeric id
    pub id: u64,
    /// Provider label
    pub provider: String,
    /// Provider-side id
    pub provider_id: String,
    /// Latest revision
    pub revision: u64,
    /// Creation time
    pub create_time: DateTime<Utc>,
    /// Last update time
    pub update_time: DateTime<Utc>,
}

impl From<&SecretDoc> for SecretMetadata {
    fn from(doc: &SecretDoc) -> Self {
        Self {
            url: SecretUrl {
                version: doc.version,
                controller_uuid: Some(doc.controller_uuid.clone()),
                model_uuid: Some(doc.model_uuid.clone()),
                path: doc.path.clone(),
                revision: 0,
                attribute: None,
            },
            path: doc.path.clone(),
            version: doc.version,
            rotate_interval: doc.rotate_interval,
            description: doc.description.clone(),
            tags: doc.tags.clone(),
            id: doc.id,
            provider: doc.provider.clone(),
            provider_id: doc.provider_id.clone(),
            revision: doc.revision,
            create_time: doc.create_time,
            update_time: doc.update_time,
        }
    }
}

/// Parameters for creating a secret
#[derive(Debug, Clone, Default)]
pub struct CreateSecretParams {
    /// Controller UUID
    pub controller_uuid: String,
    /// Model UUID
    pub model_uuid: String,
    /// Format version
    pub version: u32,
    /// Provider label
    pub provider_label: String,
    /// Secret type
    pub secret_type: String,
    /// Secret path
    pub path: String,
    /// Rotation interval
    pub rotate_interval: Duration,
    /// Description
    pub description: String,
    /// Tags
    pub tags: BTreeMap<String, String>,
    /// Provider parameters
    pub params: BTreeMap<String, serde_json::Value>,
    /// Initial value
    pub data: BTreeMap<String, String>,
}

/// Parameters for updating a secret; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateSecretParams {
    /// New rotation interval
    pub rotate_interval: Option<Duration>,
    /// New description
    pub description: Option<String>,
    /// New tags
    pub tags: Option<BTreeMap<String, String>>,
    /// New provider parameters
    pub params: Option<BTreeMap<String, serde_json::Value>>,
    /// New value
    pub data: Option<BTreeMap<String, String>>,
}

impl UpdateSecretParams {
    fn has_data(&self) -> bool {
        self.data.as_ref().is_some_and(|d| !d.is_empty())
    }

    fn is_empty(&self) -> bool {
        self.rotate_interval.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.params.is_none()
            && !self.has_data()
    }
}

/// Filter for listing secrets
#[derive(Debug, Clone, Default)]
pub struct SecretsFilter {
    /// Only secrets whose path starts with this prefix
    pub path_prefix: Option<String>,
}

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Secret storage over a model [`Store`]
#[derive(Clone)]
pub struct SecretsStore {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl SecretsStore {
    /// Secrets store using the wall clock
    pub fn new(store: Store) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Secrets store using a custom clock
    pub fn with_clock(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now().round_subsecs(0)
    }

    /// Create a secret with its first revision
    pub async fn create_secret(&self, params: CreateSecretParams) -> Result<SecretMetadata> {
        if self.store.get::<SecretDoc>(&params.path).await?.is_some() {
            return Err(Error::already_exists(SecretDoc::KIND, params.path));
        }
        let id = self.store.next_sequence("secret").await? + 1;
        let now = self.now();
        let doc = SecretDoc {
            id,
            path: params.path,
            version: params.version,
            controller_uuid: params.controller_uuid,
            model_uuid: params.model_uuid,
            secret_type: params.secret_type,
            provider: params.provider_label,
            provider_id: String::new(),
            rotate_interval: params.rotate_interval,
            description: params.description,
            tags: params.tags,
            params: params.params,
            revision: 1,
            create_time: now,
            update_time: now,
        };
        info!("Creating secret {} (id {})", doc.path, doc.id);
        self.store
            .put(&SecretRevisionDoc {
                path: doc.path.clone(),
                revision: 1,
                data: params.data,
                create_time: now,
            })
            .await?;
        self.store.insert(&doc).await?;
        Ok(SecretMetadata::from(&doc))
    }

    /// Update a secret's metadata and/or value
    pub async fn update_secret(&self, url: &SecretUrl, params: UpdateSecretParams) -> Result<SecretMetadata> {
        if params.is_empty() {
            return Err(Error::Secret(
                "must specify a new value or metadata to update a secret".to_string(),
            ));
        }
        let mut doc = self.store.fetch::<SecretDoc>(&url.path).await?;
        let now = self.now();
        let has_data = params.has_data();

        if let Some(interval) = params.rotate_interval {
            doc.rotate_interval = interval;
        }
        if let Some(description) = params.description {
            doc.description = description;
        }
        if let Some(tags) = params.tags {
            doc.tags = tags;
        }
        if let Some(p) = params.params {
            doc.params = p;
        }
        if let Some(data) = params.data.filter(|_| has_data) {
            doc.revision += 1;
            self.store
                .insert(&SecretRevisionDoc {
                    path: doc.path.clone(),
                    revision: doc.revision,
                    data,
                    create_time: now,
                })
                .await?;
        }
        doc.update_time = now;
        debug!("Updating secret {} at revision {}", doc.path, doc.revision);
        self.store.put(&doc).await?;
        Ok(SecretMetadata::from(&doc))
    }

    /// Value of a secret; revision 0 means the latest, and an attribute in
    /// the URL selects a single key
    pub async fn get_secret_value(&self, url: &SecretUrl) -> Result<BTreeMap<String, String>> {
        let doc = self.store.fetch::<SecretDoc>(&url.path).await?;
        let revision = if url.revision == 0 {
            doc.revision
        } else {
            url.revision
        };
        let key = SecretRevisionDoc {
            path: doc.path.clone(),
            revision,
            data: BTreeMap::new(),
            create_time: doc.create_time,
        }
        .key();
        let value = self
            .store
            .get::<SecretRevisionDoc>(&key)
            .await?
            .ok_or_else(|| Error::not_found(SecretRevisionDoc::KIND, url.with_revision(revision).to_string()))?;

        match &url.attribute {
            Some(attribute) => {
                let v = value.data.get(attribute).ok_or_else(|| {
                    Error::Secret(format!("secret attribute {attribute:?} not found"))
                })?;
                Ok(BTreeMap::from([(attribute.clone(), v.clone())]))
            }
            None => Ok(value.data),
        }
    }

    /// Secrets matching `filter`, ordered by path
    pub async fn list_secrets(&self, filter: &SecretsFilter) -> Result<Vec<SecretMetadata>> {
        Ok(self
            .store
            .all::<SecretDoc>()
            .await?
            .iter()
            .filter(|doc| {
                filter
                    .path_prefix
                    .as_deref()
                    .is_none_or(|prefix| doc.path.starts_with(prefix))
            })
            .map(SecretMetadata::from)
            .collect())
    }

    /// Every stored revision of a secret, oldest first
    pub async fn revisions(&self, path: &str) -> Result<Vec<SecretRevisionDoc>> {
        self.store
            .all_with_prefix(&SecretRevisionDoc::prefix(path))
            .await
    }
}
