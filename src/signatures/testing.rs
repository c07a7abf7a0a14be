//! Fixtures shared by the engine's unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::RwLock;

use super::access::{AccessControl, StaticAccess};
use super::lifecycle::Submission;
use super::relationships::{RelationshipResolver, StoreResolver};
use super::store::SignatureStore;
use super::types::{Actor, SigId, Signature};
use super::{EngineConfig, SignatureService};
use crate::triage::AnalysisPipeline;

pub const ADMIN_ID: u64 = 1;

pub async fn temp_store() -> (TempDir, Arc<SignatureStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = SignatureStore::new(dir.path()).await.unwrap();
    (dir, Arc::new(store))
}

/// Records which signatures were dispatched for analysis.
#[derive(Default)]
pub struct RecordingTriage {
    submitted: Mutex<Vec<SigId>>,
    fail_next: AtomicBool,
}

impl RecordingTriage {
    pub fn submitted(&self) -> Vec<SigId> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AnalysisPipeline for RecordingTriage {
    async fn submit(&self, record: &Signature, _actor: &Actor) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            bail!("analysis service unavailable");
        }
        self.submitted.lock().unwrap().push(record.id.clone());
        Ok(())
    }
}

pub struct Harness {
    _dir: TempDir,
    pub service: Arc<SignatureService>,
    pub store: Arc<SignatureStore>,
    pub triage: Arc<RecordingTriage>,
}

/// A service with YARA and Snort registered and user 1 as the only admin.
pub async fn harness() -> Harness {
    harness_with(StaticAccess::new(HashSet::from([ADMIN_ID]))).await
}

pub async fn harness_with(access: impl AccessControl + 'static) -> Harness {
    build(Arc::new(access), |store| {
        Arc::new(StoreResolver::new(store)) as Arc<dyn RelationshipResolver>
    })
    .await
}

/// The default harness with a custom resolver built over its store.
pub async fn harness_with_resolver<F>(resolver: F) -> Harness
where
    F: FnOnce(Arc<SignatureStore>) -> Arc<dyn RelationshipResolver>,
{
    build(Arc::new(StaticAccess::new(HashSet::from([ADMIN_ID]))), resolver).await
}

async fn build<F>(access: Arc<dyn AccessControl>, resolver: F) -> Harness
where
    F: FnOnce(Arc<SignatureStore>) -> Arc<dyn RelationshipResolver>,
{
    let (dir, store) = temp_store().await;
    let triage = Arc::new(RecordingTriage::default());
    let service = SignatureService::new(
        store.clone(),
        access,
        resolver(store.clone()),
        triage.clone(),
        Arc::new(RwLock::new(EngineConfig::default())),
    );
    service
        .seed_types(&["YARA".to_string(), "Snort".to_string()])
        .await
        .unwrap();
    Harness {
        _dir: dir,
        service: Arc::new(service),
        store,
        triage,
    }
}

pub fn analyst() -> Actor {
    Actor::new(42, "alice")
}

pub fn admin() -> Actor {
    Actor::new(ADMIN_ID, "root")
}

/// Submit `content` as a fresh YARA record from OSINT and load it back.
pub async fn submit(h: &Harness, content: &str) -> Signature {
    let result = h
        .service
        .submit_record(&Submission::new(content, "OSINT", "T1", "YARA"), &analyst())
        .await;
    assert!(result.success, "{:?}", result.message);
    let id = result.data.unwrap().id;
    h.store.get(&id).await.unwrap().unwrap()
}
