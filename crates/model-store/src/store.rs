//! Typed handle over a store backend

use crate::{
    backend::{MemoryBackend, SledBackend, StoreBackend},
    collection::Collection,
    error::{Error, Result},
    models::*,
};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Typed access to one model's documents.
///
/// Cloning a `Store` is cheap; clones share the backend. Reads are
/// independent queries with no cross-query locking.
#[derive(Clone)]
pub struct Store {
    /// Storage backend
    backend: Arc<dyn StoreBackend>,
}

impl Store {
    /// Create a store over a custom backend
    pub fn with_backend(backend: impl StoreBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create a store held entirely in memory
    pub fn in_memory() -> Self {
        Self::with_backend(MemoryBackend::new())
    }

    /// Open a persistent sled store at `path`
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading model store from {:?}", path);
        let backend = SledBackend::new(path).await?;
        Ok(Self::with_backend(backend))
    }

    /// Underlying backend
    pub fn backend(&self) -> &dyn StoreBackend {
        self.backend.as_ref()
    }

    /// Whether a collection exists
    pub async fn has_collection(&self, collection: Collection) -> Result<bool> {
        self.backend.has_collection(collection).await
    }

    /// Store a document, replacing any previous version
    pub async fn put<D: Document>(&self, doc: &D) -> Result<()> {
        let key = doc.key();
        debug!("Storing {} {}", D::KIND, key);
        let value = serde_json::to_vec(doc)?;
        self.backend.put(D::COLLECTION, &key, value).await
    }

    /// Store a new document, failing if one exists under the same key
    pub async fn insert<D: Document>(&self, doc: &D) -> Result<()> {
        let key = doc.key();
        if self.backend.get(D::COLLECTION, &key).await?.is_some() {
            return Err(Error::already_exists(D::KIND, key));
        }
        self.put(doc).await
    }

    /// Get a document by key
    pub async fn get<D: Document>(&self, key: &str) -> Result<Option<D>> {
        match self.backend.get(D::COLLECTION, key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get a document that must exist
    pub async fn fetch<D: Document>(&self, key: &str) -> Result<D> {
        self.get(key)
            .await?
            .ok_or_else(|| Error::not_found(D::KIND, key))
    }

    /// Remove a document
    pub async fn remove<D: Document>(&self, key: &str) -> Result<Option<D>> {
        match self.backend.remove(D::COLLECTION, key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Every document of a kind, ordered by key
    pub async fn all<D: Document>(&self) -> Result<Vec<D>> {
        decode_all(self.backend.scan(D::COLLECTION).await?)
    }

    /// Documents whose key starts with `prefix`, ordered by key
    pub async fn all_with_prefix<D: Document>(&self, prefix: &str) -> Result<Vec<D>> {
        decode_all(self.backend.scan_prefix(D::COLLECTION, prefix).await?)
    }

    /// Create every collection, then store the model document and seed
    /// the default space
    pub async fn initialize_model(&self, model: ModelDoc) -> Result<()> {
        self.backend.init().await?;
        if self.get::<ModelDoc>(ModelDoc::KEY).await?.is_some() {
            return Err(Error::already_exists(ModelDoc::KIND, model.uuid.to_string()));
        }
        info!("Initializing model {} ({})", model.name, model.uuid);

        self.put(&model).await?;
        self.put(&SpaceDoc {
            id: DEFAULT_SPACE_ID.to_string(),
            name: DEFAULT_SPACE_NAME.to_string(),
            provider_id: String::new(),
            is_public: true,
        })
        .await?;
        self.put(&SequenceDoc {
            name: "space".to_string(),
            counter: 1,
        })
        .await?;
        self.set_status(global_key::MODEL, Status::Available, "", Settings::new(), Utc::now())
            .await
    }

    /// The model document
    pub async fn model(&self) -> Result<ModelDoc> {
        self.get(ModelDoc::KEY)
            .await?
            .ok_or(Error::ModelNotInitialized)
    }

    /// Hand out the next value of a named sequence
    pub async fn next_sequence(&self, name: &str) -> Result<u64> {
        let mut seq = self.get::<SequenceDoc>(name).await?.unwrap_or(SequenceDoc {
            name: name.to_string(),
            counter: 0,
        });
        let value = seq.counter;
        seq.counter += 1;
        self.put(&seq).await?;
        Ok(value)
    }

    /// Set the current status of an entity and append it to its history
    pub async fn set_status(
        &self,
        global_key: &str,
        status: Status,
        message: &str,
        data: Settings,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let seq = self
            .status_history(global_key)
            .await?
            .last()
            .map_or(0, |last| last.seq + 1);
        self.put(&StatusHistoryDoc {
            global_key: global_key.to_string(),
            seq,
            status,
            message: message.to_string(),
            data: data.clone(),
            updated: at,
        })
        .await?;
        self.put(&StatusDoc {
            global_key: global_key.to_string(),
            status,
            message: message.to_string(),
            data,
            updated: at,
        })
        .await
    }

    /// Current status of an entity
    pub async fn status(&self, global_key: &str) -> Result<Option<StatusDoc>> {
        self.get(global_key).await
    }

    /// Full status history of an entity, oldest first
    pub async fn status_history(&self, global_key: &str) -> Result<Vec<StatusHistoryDoc>> {
        self.all_with_prefix(&StatusHistoryDoc::prefix(global_key))
            .await
    }

    /// Replace the annotations of an entity
    pub async fn set_annotations(
        &self,
        global_key: &str,
        annotations: impl IntoIterator<Item = (String, String)>,
    ) -> Result<()> {
        self.put(&AnnotationsDoc {
            global_key: global_key.to_string(),
            annotations: annotations.into_iter().collect(),
        })
        .await
    }

    /// Annotations of an entity (empty when none were set)
    pub async fn annotations(&self, global_key: &str) -> Result<std::collections::BTreeMap<String, String>> {
        Ok(self
            .get::<AnnotationsDoc>(global_key)
            .await?
            .map(|doc| doc.annotations)
            .unwrap_or_default())
    }

    /// Add a machine or container; a container's parent must exist
    pub async fn add_machine(&self, machine: MachineDoc) -> Result<()> {
        if let Some(parent) = machine.parent_id() {
            if self.get::<MachineDoc>(parent).await?.is_none() {
                return Err(Error::not_found(MachineDoc::KIND, parent));
            }
        }
        info!("Adding machine {}", machine.id);
        self.insert(&machine).await?;
        self.set_status(&machine.global_key(), Status::Pending, "", Settings::new(), Utc::now())
            .await
    }

    /// Record the provider instance of a machine
    pub async fn set_instance_data(&self, data: InstanceDataDoc) -> Result<()> {
        self.fetch::<MachineDoc>(&data.machine_id).await?;
        self.put(&data).await
    }

    /// Add an application
    pub async fn add_application(&self, application: ApplicationDoc) -> Result<()> {
        info!("Adding application {}", application.name);
        self.insert(&application).await
    }

    /// Add a unit to an existing application, linking it to its principal
    pub async fn add_unit(&self, unit: UnitDoc) -> Result<()> {
        self.fetch::<ApplicationDoc>(&unit.application).await?;
        if let Some(machine) = &unit.machine_id {
            self.fetch::<MachineDoc>(machine).await?;
        }
        if let Some(principal) = &unit.principal {
            let mut principal_doc = self.fetch::<UnitDoc>(principal).await?;
            if !principal_doc.subordinates.contains(&unit.name) {
                principal_doc.subordinates.push(unit.name.clone());
                self.put(&principal_doc).await?;
            }
        }
        info!("Adding unit {}", unit.name);
        self.insert(&unit).await
    }

    /// Make `unit` the leader of `application`
    pub async fn claim_leadership(&self, application: &str, unit: &str) -> Result<()> {
        self.put(&LeaseDoc {
            namespace: APPLICATION_LEADERSHIP.to_string(),
            name: application.to_string(),
            holder: unit.to_string(),
        })
        .await
    }

    /// Current leader of `application`
    pub async fn leader(&self, application: &str) -> Result<Option<String>> {
        let key = format!("{APPLICATION_LEADERSHIP}#{application}");
        Ok(self.get::<LeaseDoc>(&key).await?.map(|lease| lease.holder))
    }

    /// Add a relation between endpoints; the id comes from the `relation`
    /// sequence
    pub async fn add_relation(&self, endpoints: Vec<Endpoint>) -> Result<RelationDoc> {
        if endpoints.is_empty() || endpoints.len() > 2 {
            return Err(Error::invalid(
                "relation",
                format!("expected 1 or 2 endpoints, got {}", endpoints.len()),
            ));
        }
        let key = relation_key(&endpoints);
        if self.get::<RelationDoc>(&key).await?.is_some() {
            return Err(Error::already_exists(RelationDoc::KIND, key));
        }
        let id = self.next_sequence("relation").await? as i64;
        let relation = RelationDoc::new(id, endpoints);
        info!("Adding relation {} ({})", relation.id, relation.key);
        self.insert(&relation).await?;
        Ok(relation)
    }

    /// Relation with the given id
    pub async fn relation_by_id(&self, id: i64) -> Result<RelationDoc> {
        self.all::<RelationDoc>()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::not_found(RelationDoc::KIND, id.to_string()))
    }

    /// Enter `unit` into a relation's scope with its initial settings
    pub async fn enter_scope(&self, relation_key: &str, unit: &str, settings: Settings) -> Result<()> {
        let mut relation = self.fetch::<RelationDoc>(relation_key).await?;
        let application = unit_application(unit);
        if relation.endpoint(application).is_none() {
            return Err(Error::invalid(
                "relation scope",
                format!("{application:?} is not part of relation {relation_key:?}"),
            ));
        }
        let scope = RelationScopeDoc {
            relation_id: relation.id,
            application: application.to_string(),
            unit: unit.to_string(),
            settings,
        };
        let is_new = self
            .get::<RelationScopeDoc>(&scope.key())
            .await?
            .is_none();
        self.put(&scope).await?;
        if is_new {
            relation.unit_count += 1;
            self.put(&relation).await?;
        }
        debug!("Unit {} entered scope of {}", unit, relation_key);
        Ok(())
    }

    /// Units in scope of a relation with their settings
    pub async fn relation_scopes(&self, relation_id: i64) -> Result<Vec<RelationScopeDoc>> {
        self.all_with_prefix(&RelationScopeDoc::prefix(relation_id))
            .await
    }

    /// Set the application settings of one side of a relation
    pub async fn set_relation_app_settings(&self, relation_key: &str, application: &str, settings: Settings) -> Result<()> {
        let relation = self.fetch::<RelationDoc>(relation_key).await?;
        self.put(&RelationAppSettingsDoc {
            relation_id: relation.id,
            application: application.to_string(),
            settings,
        })
        .await
    }

    /// Add a space; the id comes from the `space` sequence
    pub async fn add_space(&self, name: &str, provider_id: &str, is_public: bool) -> Result<SpaceDoc> {
        if self
            .all::<SpaceDoc>()
            .await?
            .iter()
            .any(|space| space.name == name)
        {
            return Err(Error::already_exists(SpaceDoc::KIND, name));
        }
        let space = SpaceDoc {
            id: self.next_sequence("space").await?.to_string(),
            name: name.to_string(),
            provider_id: provider_id.to_string(),
            is_public,
        };
        self.insert(&space).await?;
        Ok(space)
    }

    /// Add a subnet. The CIDR must parse; a subnet without a space joins
    /// the default space. The id comes from the `subnet` sequence.
    pub async fn add_subnet(&self, mut subnet: SubnetDoc) -> Result<SubnetDoc> {
        subnet
            .cidr
            .parse::<ipnet::IpNet>()
            .map_err(|e| Error::invalid("subnet CIDR", format!("{:?}: {e}", subnet.cidr)))?;
        if subnet.space_id.is_empty() {
            subnet.space_id = DEFAULT_SPACE_ID.to_string();
        }
        self.fetch::<SpaceDoc>(&subnet.space_id).await?;
        if self
            .all::<SubnetDoc>()
            .await?
            .iter()
            .any(|existing| existing.cidr == subnet.cidr)
        {
            return Err(Error::already_exists(SubnetDoc::KIND, subnet.cidr));
        }
        subnet.id = self.next_sequence("subnet").await?.to_string();
        self.insert(&subnet).await?;
        Ok(subnet)
    }

    /// Record the block device the host agent found for a volume
    /// attachment plan
    pub async fn set_volume_attachment_plan_block_device(
        &self,
        volume_id: &str,
        machine_id: &str,
        device: PlanBlockDevice,
    ) -> Result<()> {
        let key = format!("{volume_id}#{machine_id}");
        let mut plan = self.fetch::<VolumeAttachmentPlanDoc>(&key).await?;
        plan.block_device = Some(device);
        self.put(&plan).await
    }
}

fn decode_all<D: Document>(entries: Vec<(String, Vec<u8>)>) -> Result<Vec<D>> {
    entries
        .into_iter()
        .map(|(_, bytes)| serde_json::from_slice(&bytes).map_err(Error::from))
        .collect()
}
