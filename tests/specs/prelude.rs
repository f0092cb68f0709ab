//! Shared fixtures for the end-to-end specs.

pub use spool_core::{FakeClock, JobSpec, JobState};
pub use spool_engine::{
    Engine, EngineConfig, EngineError, FakeProcessAdapter, SpiderEnumerator,
};
pub use spool_store::{ArtifactStore, FsArtifactStore, JsonlHistory};
pub use std::sync::Arc;
pub use tempfile::TempDir;

/// Enumerator answering from a settable in-memory list; no process runs.
pub struct StaticSpiders {
    spiders: std::sync::Mutex<Vec<String>>,
}

impl StaticSpiders {
    pub fn new(spiders: &[&str]) -> Arc<Self> {
        Arc::new(Self { spiders: std::sync::Mutex::new(owned(spiders)) })
    }

    pub fn set(&self, spiders: &[&str]) {
        *self.spiders.lock().unwrap() = owned(spiders);
    }
}

fn owned(spiders: &[&str]) -> Vec<String> {
    spiders.iter().map(|s| s.to_string()).collect()
}

impl SpiderEnumerator for StaticSpiders {
    fn enumerate(&self, _project: &str, _version: Option<&str>) -> Result<Vec<String>, EngineError> {
        Ok(self.spiders.lock().unwrap().clone())
    }
}

/// Engine on the fake process adapter and a frozen clock, with real
/// filesystem artifact storage and JSON-lines history under a temp dir.
pub struct Harness {
    pub engine: Engine<FakeProcessAdapter, FakeClock>,
    pub adapter: Arc<FakeProcessAdapter>,
    pub clock: FakeClock,
    pub store: Arc<FsArtifactStore>,
    pub spiders: Arc<StaticSpiders>,
    pub dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(|config| config)
    }

    pub fn with_config(f: impl FnOnce(EngineConfig) -> EngineConfig) -> Self {
        let dir = TempDir::new().unwrap();
        let config = f(EngineConfig {
            logs_dir: dir.path().join("logs"),
            items_dir: dir.path().join("items"),
            eggs_dir: dir.path().join("eggs"),
            history_file: dir.path().join("history.jsonl"),
            ..EngineConfig::default()
        });
        let store = Arc::new(FsArtifactStore::new(config.eggs_dir.clone()));
        let history = Arc::new(JsonlHistory::new(config.history_file.clone()));
        let adapter = Arc::new(FakeProcessAdapter::new());
        let clock = FakeClock::new();
        let spiders = StaticSpiders::new(&["alpha", "beta"]);
        let engine = Engine::new(
            config,
            store.clone(),
            history,
            spiders.clone(),
            adapter.clone(),
            clock.clone(),
        );
        Harness { engine, adapter, clock, store, spiders, dir }
    }

    /// Store an artifact directly, bypassing spider enumeration.
    pub fn put(&self, project: &str, version: &str) {
        self.store.put(project, version, b"egg-bytes").unwrap();
    }

    pub fn schedule(&self, project: &str, spider: &str, job_id: &str) {
        self.engine
            .schedule(JobSpec::builder().project(project).spider(spider).job_id(job_id).build())
            .unwrap();
    }

    /// Pid of the running instance of `job_id`.
    pub fn pid_of(&self, job_id: &str) -> u32 {
        self.engine
            .list_jobs(None)
            .unwrap()
            .running
            .iter()
            .find(|e| e.id == job_id)
            .map(|e| e.pid)
            .unwrap()
    }

    /// Drive `job_id` from running to finished with the given exit code.
    pub fn finish(&self, job_id: &str, exit_code: i32) {
        assert!(self.adapter.exit(self.pid_of(job_id), Some(exit_code)));
        self.engine.tick_now();
    }
}
