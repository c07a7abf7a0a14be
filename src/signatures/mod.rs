pub mod access;
pub mod annotations;
pub mod chain;
pub mod content;
pub mod dates;
pub mod error;
pub mod lifecycle;
pub mod provenance;
pub mod relationships;
pub mod store;
pub mod tags;
pub mod types;

#[cfg(test)]
pub mod testing;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::triage::AnalysisPipeline;
use access::AccessControl;
use relationships::RelationshipResolver;
use store::SignatureStore;

/// Runtime-tunable engine parameters (admins can modify at runtime).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Extra attempts for annotation edits that lose an optimistic race.
    pub annotation_retries: u32,
    /// Extra attempts for submissions that hit a dedup or revision race.
    pub submit_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            annotation_retries: 5,
            submit_retries: 3,
        }
    }
}

/// Signature operations over a store and the external collaborators.
pub struct SignatureService {
    store: Arc<SignatureStore>,
    access: Arc<dyn AccessControl>,
    resolver: Arc<dyn RelationshipResolver>,
    pipeline: Arc<dyn AnalysisPipeline>,
    config: Arc<RwLock<EngineConfig>>,
}

impl SignatureService {
    pub fn new(
        store: Arc<SignatureStore>,
        access: Arc<dyn AccessControl>,
        resolver: Arc<dyn RelationshipResolver>,
        pipeline: Arc<dyn AnalysisPipeline>,
        config: Arc<RwLock<EngineConfig>>,
    ) -> Self {
        Self {
            store,
            access,
            resolver,
            pipeline,
            config,
        }
    }

    async fn annotation_retries(&self) -> u32 {
        self.config.read().await.annotation_retries
    }
}
