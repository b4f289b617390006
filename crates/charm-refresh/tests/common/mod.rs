//! Fake collaborators for refresher tests

#![allow(dead_code)]

use async_trait::async_trait;
use charm_refresh::{
    CharmAdder, CharmId, CharmRepository, CharmResolver, LocalCharm, RefreshError, Refresher,
    RefresherConfig, RepositoryError, ResolvedCharm, Result,
};
use model_store::models::{Channel, CharmOrigin, CharmUrl, OriginSource};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

pub fn url(s: &str) -> CharmUrl {
    s.parse().unwrap()
}

/// Config for application "winnie" currently running `reference`
pub fn basic_config(reference: &str) -> RefresherConfig {
    RefresherConfig::new("winnie", Some(url(reference)), reference)
        .with_origin(CharmOrigin::new(OriginSource::Local))
}

/// Same as [`basic_config`] with a charm hub origin on `series`
pub fn config_with_hub_origin(reference: &str, series: &str) -> RefresherConfig {
    let mut origin = CharmOrigin::new(OriginSource::CharmHub);
    origin.channel = Some(Channel::default());
    origin.platform.series = series.to_string();
    basic_config(reference).with_origin(origin)
}

/// Resolver answering every request with a fixed URL
pub struct FakeResolver {
    url: CharmUrl,
    supported_series: Vec<String>,
    pub calls: Mutex<Vec<(CharmUrl, CharmOrigin, bool)>>,
}

impl FakeResolver {
    pub fn new(url: CharmUrl) -> Arc<Self> {
        Self::with_series(url, &[])
    }

    pub fn with_series(url: CharmUrl, series: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            url,
            supported_series: series.iter().map(|s| s.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(CharmUrl, CharmOrigin, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CharmResolver for FakeResolver {
    async fn resolve_charm(
        &self,
        url: &CharmUrl,
        origin: &CharmOrigin,
        switch: bool,
    ) -> Result<ResolvedCharm> {
        self.calls
            .lock()
            .unwrap()
            .push((url.clone(), origin.clone(), switch));
        Ok(ResolvedCharm {
            url: self.url.clone(),
            origin: origin.clone(),
            supported_series: self.supported_series.clone(),
        })
    }
}

/// Adder recording everything it is asked to do
#[derive(Default)]
pub struct FakeAdder {
    pub placement_error: Option<String>,
    pub added: Mutex<Vec<(CharmUrl, CharmOrigin, bool)>>,
    pub added_local: Mutex<Vec<(CharmUrl, String, bool)>>,
    pub placements: Mutex<Vec<(String, CharmUrl)>>,
}

impl FakeAdder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_placement(msg: &str) -> Arc<Self> {
        Arc::new(Self {
            placement_error: Some(msg.to_string()),
            ..Self::default()
        })
    }
}

#[async_trait]
impl CharmAdder for FakeAdder {
    async fn add_charm(
        &self,
        url: &CharmUrl,
        origin: &CharmOrigin,
        force: bool,
    ) -> Result<CharmOrigin> {
        self.added
            .lock()
            .unwrap()
            .push((url.clone(), origin.clone(), force));
        Ok(origin.clone())
    }

    async fn add_local_charm(
        &self,
        url: &CharmUrl,
        charm: &LocalCharm,
        force: bool,
    ) -> Result<CharmUrl> {
        self.added_local
            .lock()
            .unwrap()
            .push((url.clone(), charm.name.clone(), force));
        Ok(url.clone())
    }

    async fn check_charm_placement(&self, application: &str, url: &CharmUrl) -> Result<()> {
        self.placements
            .lock()
            .unwrap()
            .push((application.to_string(), url.clone()));
        match &self.placement_error {
            Some(msg) => Err(RefreshError::collaborator(msg.clone())),
            None => Ok(()),
        }
    }
}

/// What the fake repository finds on disk
pub enum OnDisk {
    Charm(&'static str),
    Nothing,
    NotACharm,
}

pub struct FakeRepository {
    on_disk: OnDisk,
    pub calls: Mutex<Vec<(String, Option<String>, bool)>>,
}

impl FakeRepository {
    pub fn new(on_disk: OnDisk) -> Arc<Self> {
        Arc::new(Self {
            on_disk,
            calls: Mutex::new(Vec::new()),
        })
    }
}

impl CharmRepository for FakeRepository {
    fn charm_at_path(
        &self,
        path: &str,
        series: Option<&str>,
        force_series: bool,
    ) -> std::result::Result<(LocalCharm, CharmUrl), RepositoryError> {
        self.calls.lock().unwrap().push((
            path.to_string(),
            series.map(str::to_string),
            force_series,
        ));
        match self.on_disk {
            OnDisk::Charm(name) => Ok((
                LocalCharm {
                    name: name.to_string(),
                    series: vec![],
                },
                url(&format!("local:{name}")),
            )),
            OnDisk::Nothing => Err(RepositoryError::NotExist(path.to_string())),
            OnDisk::NotACharm => Err(RepositoryError::NotFound(path.to_string())),
        }
    }
}

/// What a scripted refresher does when consulted
pub enum Script {
    Decline,
    Exhausted,
    Resolve(CharmId),
    Fail(&'static str),
    AllowedError(&'static str),
}

/// Calls recorded by refreshers sharing a log, e.g. `allowed#1`
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Refresher following a fixed script and counting calls
pub struct ScriptedRefresher {
    script: Script,
    pub allowed_calls: Arc<AtomicUsize>,
    pub refresh_calls: Arc<AtomicUsize>,
    log: Option<(usize, CallLog)>,
}

impl ScriptedRefresher {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            allowed_calls: Arc::new(AtomicUsize::new(0)),
            refresh_calls: Arc::new(AtomicUsize::new(0)),
            log: None,
        }
    }

    /// Record calls into `log` tagged with `index`
    pub fn logged(script: Script, index: usize, log: &CallLog) -> Self {
        Self {
            log: Some((index, log.clone())),
            ..Self::new(script)
        }
    }

    fn record(&self, call: &str) {
        if let Some((index, log)) = &self.log {
            log.lock().unwrap().push(format!("{call}#{index}"));
        }
    }
}

#[async_trait]
impl Refresher for ScriptedRefresher {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn allowed(&self, _config: &RefresherConfig) -> Result<bool> {
        self.allowed_calls.fetch_add(1, Ordering::SeqCst);
        self.record("allowed");
        match self.script {
            Script::Decline => Ok(false),
            Script::AllowedError(msg) => Err(RefreshError::collaborator(msg)),
            _ => Ok(true),
        }
    }

    async fn refresh(&self, _config: &RefresherConfig) -> Result<CharmId> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.record("refresh");
        match &self.script {
            Script::Resolve(id) => Ok(id.clone()),
            Script::Exhausted => Err(RefreshError::Exhausted),
            Script::Fail(msg) => Err(RefreshError::collaborator(*msg)),
            Script::Decline | Script::AllowedError(_) => unreachable!("refresh on declined refresher"),
        }
    }
}
