use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::dates::parse_fuzzy_date;
use super::error::{OpResult, SigResult, SignatureError};
use super::store::SignatureStore;
use super::types::{Actor, Relationship, Signature};
use super::SignatureService;

/// Object type name under which signatures are related to.
pub const SIGNATURE_TYPE: &str = "Signature";

/// An object a relationship can point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedObject {
    pub object_type: String,
    pub object_id: String,
}

/// Looks up relatable objects by type and ID.
#[async_trait]
pub trait RelationshipResolver: Send + Sync {
    async fn resolve(&self, object_type: &str, object_id: &str) -> Result<Option<RelatedObject>>;
}

/// Resolves signatures from the local store. Other object types are not
/// known here and resolve to `None`.
pub struct StoreResolver {
    store: Arc<SignatureStore>,
}

impl StoreResolver {
    pub fn new(store: Arc<SignatureStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RelationshipResolver for StoreResolver {
    async fn resolve(&self, object_type: &str, object_id: &str) -> Result<Option<RelatedObject>> {
        if object_type != SIGNATURE_TYPE {
            return Ok(None);
        }
        Ok(self.store.get(object_id).await?.map(|sig| RelatedObject {
            object_type: SIGNATURE_TYPE.to_string(),
            object_id: sig.id,
        }))
    }
}

impl Signature {
    /// Returns false if an identical (type, id, kind) relationship exists.
    pub fn add_relationship(
        &mut self,
        target: &RelatedObject,
        kind: &str,
        relationship_date: Option<DateTime<Utc>>,
        analyst: &str,
        now: DateTime<Utc>,
    ) -> bool {
        let exists = self.relationships.iter().any(|r| {
            r.rel_type == target.object_type
                && r.rel_object_id == target.object_id
                && r.relationship == kind
        });
        if exists {
            return false;
        }
        self.relationships.push(Relationship {
            rel_type: target.object_type.clone(),
            rel_object_id: target.object_id.clone(),
            relationship: kind.to_string(),
            relationship_date,
            analyst: analyst.to_string(),
            date: now,
        });
        true
    }
}

impl SignatureService {
    /// Copy relationships from the first record of `source_link_id` onto
    /// `target`.
    ///
    /// Relationship creation needs the target's persisted identity as an
    /// endpoint, so when there is anything to copy the target is saved and
    /// reloaded first. Objects that no longer resolve are skipped. Returns
    /// the (possibly saved) target for the caller to finish and save.
    pub(crate) async fn propagate(
        &self,
        target: Signature,
        source_link_id: &str,
        actor: &Actor,
    ) -> SigResult<Signature> {
        let Some(first) = self.store.first_in_chain(source_link_id).await? else {
            return Ok(target);
        };
        if first.relationships.is_empty() {
            return Ok(target);
        }

        let mut target = target;
        self.store.save(&mut target).await?;
        let mut target = self
            .store
            .get(&target.id)
            .await?
            .ok_or_else(|| SignatureError::NotFound(format!("Signature {} vanished.", target.id)))?;

        let now = Utc::now();
        let mut copied = 0usize;
        for rel in &first.relationships {
            if rel.rel_type == SIGNATURE_TYPE && rel.rel_object_id == target.id {
                continue;
            }
            match self.resolver.resolve(&rel.rel_type, &rel.rel_object_id).await {
                Ok(Some(object)) => {
                    if target.add_relationship(
                        &object,
                        &rel.relationship,
                        rel.relationship_date,
                        &actor.name,
                        now,
                    ) {
                        copied += 1;
                        self.link_back(&object, &target.id, &rel.relationship, rel.relationship_date, actor)
                            .await;
                    }
                }
                Ok(None) => {
                    debug!(
                        rel_type = %rel.rel_type,
                        rel_id = %rel.rel_object_id,
                        "related object not found; skipping"
                    );
                }
                Err(e) => {
                    warn!(
                        rel_type = %rel.rel_type,
                        rel_id = %rel.rel_object_id,
                        "could not resolve related object, skipping: {:#}",
                        e
                    );
                }
            }
        }

        info!(
            sig_id = %target.id,
            from = %first.id,
            copied,
            "relationships propagated"
        );
        Ok(target)
    }

    /// Relate record `id` to another object.
    pub async fn relate(
        &self,
        id: &str,
        object_type: &str,
        object_id: &str,
        kind: &str,
        relationship_date: Option<&str>,
        actor: &Actor,
    ) -> OpResult<Vec<Relationship>> {
        self.try_relate(id, object_type, object_id, kind, relationship_date, actor)
            .await
            .into()
    }

    async fn try_relate(
        &self,
        id: &str,
        object_type: &str,
        object_id: &str,
        kind: &str,
        relationship_date: Option<&str>,
        actor: &Actor,
    ) -> SigResult<Vec<Relationship>> {
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(SignatureError::InvalidInput("Relationship type is required.".into()));
        }
        if object_type == SIGNATURE_TYPE && object_id == id {
            return Err(SignatureError::InvalidInput(
                "Cannot relate a signature to itself.".into(),
            ));
        }
        let relationship_date = relationship_date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(parse_fuzzy_date)
            .transpose()?;

        let object = self
            .resolver
            .resolve(object_type, object_id)
            .await?
            .ok_or_else(|| {
                SignatureError::NotFound(format!("{} {} not found.", object_type, object_id))
            })?;

        let retries = self.annotation_retries().await;
        let (_, sig) = self
            .store
            .update(id, retries, |sig| {
                if sig.add_relationship(&object, kind, relationship_date, &actor.name, Utc::now()) {
                    Ok(())
                } else {
                    Err(SignatureError::SoftFailure("Relationship already exists.".into()))
                }
            })
            .await?;
        self.link_back(&object, id, kind, relationship_date, actor).await;

        info!(sig_id = id, rel_type = object_type, rel_id = object_id, kind, "relationship added");
        Ok(sig.relationships)
    }

    /// Record the reverse side when the other end is also a signature.
    /// Failures are logged; the forward relationship stands on its own.
    async fn link_back(
        &self,
        object: &RelatedObject,
        from_id: &str,
        kind: &str,
        relationship_date: Option<DateTime<Utc>>,
        actor: &Actor,
    ) {
        if object.object_type != SIGNATURE_TYPE {
            return;
        }
        let back = RelatedObject {
            object_type: SIGNATURE_TYPE.to_string(),
            object_id: from_id.to_string(),
        };
        let retries = self.annotation_retries().await;
        let result = self
            .store
            .update(&object.object_id, retries, |other| {
                if other.add_relationship(&back, kind, relationship_date, &actor.name, Utc::now()) {
                    Ok(())
                } else {
                    Err(SignatureError::SoftFailure("already linked".into()))
                }
            })
            .await;
        match result {
            Ok(_) | Err(SignatureError::SoftFailure(_)) => {}
            Err(e) => warn!(sig_id = %object.object_id, from = from_id, "reverse relationship not recorded: {}", e),
        }
    }
}
