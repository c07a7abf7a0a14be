use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::{ErrorKind, OpResult, SigResult, SignatureError};
use super::provenance;
use super::tags::TagInput;
use super::types::{Actor, ProvenanceInput, SigId, Signature, SignatureDetails, SignatureType};
use super::SignatureService;

/// Everything a caller supplies when submitting signature content.
#[derive(Debug, Clone)]
pub struct Submission {
    pub content: String,
    pub source: ProvenanceInput,
    pub title: String,
    pub data_type: String,
    pub description: Option<String>,
    /// Link to an existing chain, making this a new version of it.
    pub link_id: Option<String>,
    pub method: String,
    pub reference: String,
    /// Copy relationships from the chain's first record (needs `link_id`).
    pub copy_relationships: bool,
    pub buckets: Option<TagInput>,
    pub tickets: Option<TagInput>,
}

impl Submission {
    pub fn new(
        content: impl Into<String>,
        source: impl Into<ProvenanceInput>,
        title: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            title: title.into(),
            data_type: data_type.into(),
            description: None,
            link_id: None,
            method: String::new(),
            reference: String::new(),
            copy_relationships: false,
            buckets: None,
            tickets: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Submitted {
    pub id: SigId,
    pub link_id: String,
    pub version: u32,
    /// False when the content matched an existing record.
    pub created: bool,
}

/// What earlier attempts of one submission already persisted.
///
/// Propagation saves the record before the final save, so a retry can find
/// a record this same submission created.
#[derive(Debug, Default)]
struct SubmitProgress {
    persisted: Option<SigId>,
    created: bool,
}

impl SubmitProgress {
    fn record_saved(&mut self, record: &Signature, fresh: bool) {
        self.persisted = Some(record.id.clone());
        self.created |= fresh;
    }

    fn wrote(&self, record: &Signature) -> bool {
        self.persisted.as_deref() == Some(record.id.as_str())
    }
}

impl SignatureService {
    /// Submit content, creating a record or adding provenance to the one
    /// that already holds these bytes.
    ///
    /// Dedup and revision races are retried from the top, re-resolving by
    /// content hash.
    pub async fn submit_record(&self, submission: &Submission, actor: &Actor) -> OpResult<Submitted> {
        let retries = self.config.read().await.submit_retries;
        let mut progress = SubmitProgress::default();
        let mut attempt = 0;
        loop {
            match self.try_submit(submission, actor, &mut progress).await {
                Err(e) if e.is_retryable() && attempt < retries => {
                    attempt += 1;
                    debug!(attempt, "{}; re-resolving submission", e);
                }
                result => return OpResult::from(result).with_message("Uploaded signature"),
            }
        }
    }

    async fn try_submit(
        &self,
        sub: &Submission,
        actor: &Actor,
        progress: &mut SubmitProgress,
    ) -> SigResult<Submitted> {
        if sub.content.is_empty() || sub.title.trim().is_empty() || sub.data_type.trim().is_empty() {
            return Err(SignatureError::InvalidInput(
                "No data object, title, or data type passed in".into(),
            ));
        }
        let now = Utc::now();
        let sources =
            provenance::normalize(&sub.source, &sub.method, &sub.reference, &actor.name, now)?;
        let data_type = sub.data_type.trim();
        if self.store.get_type(data_type).await?.is_none() {
            return Err(SignatureError::InvalidInput(
                "Invalid data type passed in".into(),
            ));
        }

        let (existing, hash) = self.store.resolve(sub.content.as_bytes()).await?;
        let fresh = existing.is_none();
        let mut record = existing.unwrap_or_else(|| {
            Signature::new(
                hash,
                sub.content.clone(),
                sub.title.trim(),
                sub.description.clone(),
                data_type,
                now,
            )
        });
        // A record an earlier attempt saved already carries these sources.
        if !progress.wrote(&record) {
            record.merge_sources(sources);
        }
        if let Some(buckets) = &sub.buckets {
            record.add_bucket_list(buckets);
        }
        if let Some(tickets) = &sub.tickets {
            record.add_tickets(tickets, &actor.name, now);
        }

        if let Some(link_id) = sub.link_id.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            record.link_id = link_id.to_string();
            if sub.copy_relationships {
                let revision = record.revision;
                record = self.propagate(record, link_id, actor).await?;
                if record.revision != revision {
                    progress.record_saved(&record, fresh);
                }
            }
        }

        self.store.save(&mut record).await?;
        progress.record_saved(&record, fresh);
        let created = progress.created;
        info!(
            sig_id = %record.id,
            link_id = %record.link_id,
            version = record.version,
            created,
            analyst = %actor,
            "signature submitted"
        );

        if created {
            let reloaded = self.store.get(&record.id).await?.unwrap_or_else(|| record.clone());
            self.dispatch_analysis(reloaded, actor);
        }

        Ok(Submitted {
            id: record.id,
            link_id: record.link_id,
            version: record.version,
            created,
        })
    }

    /// Hand a new record to the analysis pipeline without waiting on it.
    fn dispatch_analysis(&self, record: Signature, actor: &Actor) {
        let pipeline = self.pipeline.clone();
        let actor = actor.clone();
        tokio::spawn(async move {
            if let Err(e) = pipeline.submit(&record, &actor).await {
                warn!(sig_id = %record.id, "analysis dispatch failed: {:#}", e);
            }
        });
    }

    /// Change a record's data type. An unregistered type is reported as not
    /// found and leaves the record untouched.
    pub async fn update_data_type(&self, id: &str, data_type: &str, actor: &Actor) -> OpResult<()> {
        self.try_update_data_type(id, data_type, actor).await.into()
    }

    async fn try_update_data_type(&self, id: &str, data_type: &str, actor: &Actor) -> SigResult<()> {
        let data_type = data_type.trim();
        let Some(registered) = self.store.get_type(data_type).await? else {
            return Err(SignatureError::NotFound(format!(
                "Unknown signature type: {}",
                data_type
            )));
        };
        let retries = self.annotation_retries().await;
        self.store
            .update(id, retries, |sig| {
                sig.data_type = registered.name.clone();
                Ok(())
            })
            .await?;
        info!(sig_id = id, data_type, analyst = %actor, "data type updated");
        Ok(())
    }

    /// Admin-only, immediate and complete removal. Reports whether a record existed.
    pub async fn delete_record(&self, id: &str, actor: &Actor) -> OpResult<bool> {
        if !self.access.is_admin(actor) {
            warn!(sig_id = id, analyst = %actor, "non-admin delete refused");
            return OpResult::fail(
                ErrorKind::PermissionDenied,
                "Only admins can delete signatures.",
            );
        }
        let result: SigResult<bool> = self.store.delete(id).await.map_err(Into::into);
        if let Ok(existed) = result {
            info!(sig_id = id, existed, analyst = %actor, "signature delete");
        }
        result.into()
    }

    /// A record as `actor` may see it, scoped by source visibility.
    pub async fn get_details(&self, id: &str, actor: &Actor) -> OpResult<SignatureDetails> {
        self.try_get_details(id, actor).await.into()
    }

    async fn try_get_details(&self, id: &str, actor: &Actor) -> SigResult<SignatureDetails> {
        let hidden = || {
            SignatureError::NotFound(
                "Signature not yet available or you do not have access to view it.".into(),
            )
        };
        let signature = self.store.get(id).await?.ok_or_else(hidden)?;
        if let Some(visible) = self.access.sources_visible_to(actor) {
            if !signature.source_names().any(|name| visible.contains(name)) {
                return Err(hidden());
            }
        }
        let versions = self.store.chain_len(&signature.link_id).await?;
        Ok(SignatureDetails {
            signature,
            versions,
        })
    }

    /// Register a new data type. Empty or already registered names fail.
    pub async fn add_signature_type(&self, name: &str, actor: &Actor) -> OpResult<SignatureType> {
        self.try_add_signature_type(name, actor).await.into()
    }

    async fn try_add_signature_type(&self, name: &str, actor: &Actor) -> SigResult<SignatureType> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SignatureError::InvalidInput("Type name is required.".into()));
        }
        let signature_type = SignatureType {
            name: name.to_string(),
            analyst: actor.name.clone(),
            created: Utc::now(),
        };
        if !self.store.put_type(&signature_type).await? {
            return Err(SignatureError::Validation(format!(
                "Signature type {} already exists.",
                name
            )));
        }
        info!(name, analyst = %actor, "signature type added");
        Ok(signature_type)
    }

    /// Register any of `names` not yet known. Returns how many were added.
    pub async fn seed_types(&self, names: &[String]) -> anyhow::Result<usize> {
        let mut added = 0;
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            let signature_type = SignatureType {
                name: name.to_string(),
                analyst: "system".to_string(),
                created: Utc::now(),
            };
            if self.store.put_type(&signature_type).await? {
                added += 1;
            }
        }
        if added > 0 {
            info!(added, "seeded signature types");
        }
        Ok(added)
    }

    pub async fn list_signature_types(&self) -> OpResult<Vec<SignatureType>> {
        let result: SigResult<_> = self.store.list_types().await.map_err(Into::into);
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signatures::access::{parse_source_acl, StaticAccess};
    use crate::signatures::content::content_hash;
    use crate::signatures::relationships::{
        RelatedObject, RelationshipResolver, StoreResolver, SIGNATURE_TYPE,
    };
    use crate::signatures::store::SignatureStore;
    use crate::signatures::testing::{
        admin, analyst, harness, harness_with, harness_with_resolver, submit, ADMIN_ID,
    };
    use crate::signatures::types::{ContentHash, ProvenanceEntry};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Resolves through the store, but the first time it sees the record
    /// holding `watched` it edits that record behind the caller's back.
    struct EditsWatchedOnce {
        inner: StoreResolver,
        store: Arc<SignatureStore>,
        watched: ContentHash,
        fired: AtomicBool,
    }

    #[async_trait]
    impl RelationshipResolver for EditsWatchedOnce {
        async fn resolve(
            &self,
            object_type: &str,
            object_id: &str,
        ) -> anyhow::Result<Option<RelatedObject>> {
            if !self.fired.load(Ordering::SeqCst) {
                if let Some(sig) = self.store.find_by_hash(&self.watched).await? {
                    self.fired.store(true, Ordering::SeqCst);
                    self.store
                        .update(&sig.id, 0, |s| {
                            s.bucket_list.push("concurrent".into());
                            Ok(())
                        })
                        .await?;
                }
            }
            self.inner.resolve(object_type, object_id).await
        }
    }

    #[tokio::test]
    async fn test_dedup_and_versioning_example() {
        let h = harness().await;
        let first = h
            .service
            .submit_record(&Submission::new("ruleA", "OSINT", "T1", "YARA"), &analyst())
            .await;
        assert!(first.success);
        assert_eq!(first.message.as_deref(), Some("Uploaded signature"));
        let first = first.data.unwrap();
        assert!(first.created);
        assert_eq!(first.version, 1);

        let mut again = Submission::new("ruleA", "OtherFeed", "Renamed", "YARA");
        again.description = Some("ignored".into());
        let second = h.service.submit_record(&again, &analyst()).await.data.unwrap();
        assert_eq!(second.id, first.id);
        assert!(!second.created);
        assert_eq!(second.version, 1);

        let stored = h.store.get(&first.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "T1");
        assert_eq!(stored.description, None);
        assert_eq!(stored.source_names().collect::<Vec<_>>(), vec!["OSINT", "OtherFeed"]);

        let mut linked = Submission::new("ruleB", "OSINT", "T1 v2", "YARA");
        linked.link_id = Some(first.link_id.clone());
        let third = h.service.submit_record(&linked, &analyst()).await.data.unwrap();
        assert_eq!(third.version, 2);
        assert_eq!(third.link_id, first.link_id);
    }

    #[tokio::test]
    async fn test_same_source_merges_instances() {
        let h = harness().await;
        let a = h
            .service
            .submit_record(&Submission::new("rule m {}", "OSINT", "T", "YARA"), &analyst())
            .await
            .data
            .unwrap();
        h.service
            .submit_record(&Submission::new("rule m {}", "OSINT", "T", "YARA"), &admin())
            .await;

        let stored = h.store.get(&a.id).await.unwrap().unwrap();
        assert_eq!(stored.sources.len(), 1);
        assert_eq!(stored.sources[0].instances.len(), 2);
        assert_eq!(stored.sources[0].instances[1].analyst, admin().name);
    }

    #[tokio::test]
    async fn test_structured_sources_accepted() {
        let h = harness().await;
        let entries = vec![
            ProvenanceEntry {
                source_name: "Partner".into(),
                date: Utc::now(),
                method: String::new(),
                reference: "TLP:AMBER".into(),
                analyst: "bob".into(),
            },
            ProvenanceEntry {
                source_name: "OSINT".into(),
                date: Utc::now(),
                method: "scrape".into(),
                reference: String::new(),
                analyst: "bob".into(),
            },
        ];
        let mut sub = Submission::new("rule s {}", ProvenanceInput::Entries(entries), "T", "YARA");
        sub.method = "upload".into();
        let out = h.service.submit_record(&sub, &analyst()).await.data.unwrap();

        let stored = h.store.get(&out.id).await.unwrap().unwrap();
        assert_eq!(stored.sources.len(), 2);
        assert_eq!(stored.sources[0].instances[0].method, "upload");
        assert_eq!(stored.sources[1].instances[0].method, "scrape");
    }

    #[tokio::test]
    async fn test_sequential_chain_versions() {
        let h = harness().await;
        let root = submit(&h, "rule root {}").await;
        for n in 2..=5u32 {
            let mut sub = Submission::new(format!("rule r{n} {{}}"), "OSINT", "T", "YARA");
            sub.link_id = Some(root.link_id.clone());
            let out = h.service.submit_record(&sub, &analyst()).await.data.unwrap();
            assert_eq!(out.version, n);
        }
        let versions: Vec<u32> = h
            .service
            .list_versions(&root.id)
            .await
            .data
            .unwrap()
            .iter()
            .map(|v| v.version)
            .collect();
        assert_eq!(versions, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_into_one_chain() {
        let h = harness().await;
        let root = submit(&h, "rule root {}").await;

        let mut handles = Vec::new();
        for n in 0..6 {
            let service = h.service.clone();
            let link = root.link_id.clone();
            handles.push(tokio::spawn(async move {
                let mut sub = Submission::new(format!("rule p{n} {{}}"), "OSINT", "T", "YARA");
                sub.link_id = Some(link);
                service.submit_record(&sub, &analyst()).await.data.unwrap().version
            }));
        }
        let mut versions = Vec::new();
        for handle in handles {
            versions.push(handle.await.unwrap());
        }
        versions.sort_unstable();
        assert_eq!(versions, (2..=7).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn test_concurrent_identical_content_yields_one_record() {
        let h = harness().await;
        h.service.config.write().await.submit_retries = 32;
        let mut handles = Vec::new();
        for n in 0..5 {
            let service = h.service.clone();
            handles.push(tokio::spawn(async move {
                let sub = Submission::new("rule same {}", format!("feed{n}").as_str(), "T", "YARA");
                service.submit_record(&sub, &analyst()).await
            }));
        }
        let mut ids = HashSet::new();
        for handle in handles {
            let result = handle.await.unwrap();
            assert!(result.success, "{:?}", result.message);
            ids.insert(result.data.unwrap().id);
        }
        assert_eq!(ids.len(), 1);
        let id = ids.into_iter().next().unwrap();
        assert_eq!(h.store.get(&id).await.unwrap().unwrap().sources.len(), 5);
    }

    #[tokio::test]
    async fn test_submission_validation() {
        let h = harness().await;
        let cases = [
            (Submission::new("", "OSINT", "T", "YARA"), "No data object, title, or data type passed in"),
            (Submission::new("x", "OSINT", "", "YARA"), "No data object, title, or data type passed in"),
            (Submission::new("x", "", "T", "YARA"), "Missing source information."),
            (Submission::new("x", "OSINT", "T", "Unknown"), "Invalid data type passed in"),
        ];
        for (sub, message) in cases {
            let r = h.service.submit_record(&sub, &analyst()).await;
            assert!(!r.success);
            assert_eq!(r.kind, Some(ErrorKind::InvalidInput));
            assert_eq!(r.message.as_deref(), Some(message));
        }
    }

    #[tokio::test]
    async fn test_tags_applied_on_submit() {
        let h = harness().await;
        let mut sub = Submission::new("rule t {}", "OSINT", "T", "YARA");
        sub.buckets = Some(TagInput::Csv("apt1, apt2".into()));
        sub.tickets = Some(TagInput::List(vec!["INC-9".into()]));
        let out = h.service.submit_record(&sub, &analyst()).await.data.unwrap();

        let stored = h.store.get(&out.id).await.unwrap().unwrap();
        assert_eq!(stored.bucket_list, vec!["apt1", "apt2"]);
        assert_eq!(stored.tickets[0].ticket_number, "INC-9");
    }

    #[tokio::test]
    async fn test_analysis_dispatched_only_for_new_records() {
        let h = harness().await;
        let sub = Submission::new("rule n {}", "OSINT", "T", "YARA");
        let id = h.service.submit_record(&sub, &analyst()).await.data.unwrap().id;
        h.service.submit_record(&sub, &analyst()).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(h.triage.submitted(), vec![id]);
    }

    #[tokio::test]
    async fn test_analysis_failure_does_not_fail_submission() {
        let h = harness().await;
        h.triage.fail_next();
        let r = h
            .service
            .submit_record(&Submission::new("rule f {}", "OSINT", "T", "YARA"), &analyst())
            .await;
        assert!(r.success);
    }

    #[tokio::test]
    async fn test_update_data_type() {
        let h = harness().await;
        let sig = submit(&h, "rule u {}").await;

        let unknown = h.service.update_data_type(&sig.id, "Bogus", &analyst()).await;
        assert!(unknown.is_not_found());
        assert_eq!(h.store.get(&sig.id).await.unwrap().unwrap().data_type, "YARA");

        let ok = h.service.update_data_type(&sig.id, "Snort", &analyst()).await;
        assert!(ok.success);
        assert_eq!(h.store.get(&sig.id).await.unwrap().unwrap().data_type, "Snort");

        let missing = h.service.update_data_type("nope", "Snort", &analyst()).await;
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let h = harness().await;
        let sig = submit(&h, "rule d {}").await;

        let denied = h.service.delete_record(&sig.id, &analyst()).await;
        assert_eq!(denied.kind, Some(ErrorKind::PermissionDenied));
        assert!(h.store.get(&sig.id).await.unwrap().is_some());

        assert_eq!(h.service.delete_record(&sig.id, &admin()).await.data, Some(true));
        assert_eq!(h.service.delete_record(&sig.id, &admin()).await.data, Some(false));
        assert!(h.store.get(&sig.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_details_scoped_by_source() {
        let access = StaticAccess::new(HashSet::from([ADMIN_ID]))
            .with_source_acl(parse_source_acl("42=Partner"));
        let h = harness_with(access).await;
        let sig = submit(&h, "rule v {}").await;

        let hidden = h.service.get_details(&sig.id, &analyst()).await;
        assert!(hidden.is_not_found());

        let seen = h.service.get_details(&sig.id, &admin()).await.data.unwrap();
        assert_eq!(seen.versions, 1);

        h.service
            .submit_record(&Submission::new("rule v {}", "Partner", "T", "YARA"), &admin())
            .await;
        assert!(h.service.get_details(&sig.id, &analyst()).await.success);
    }

    #[tokio::test]
    async fn test_signature_types() {
        let h = harness().await;
        assert!(h.service.add_signature_type(" Sigma ", &admin()).await.success);
        let dup = h.service.add_signature_type("Sigma", &admin()).await;
        assert!(!dup.success);
        assert!(!h.service.add_signature_type("  ", &admin()).await.success);

        let names: Vec<String> = h
            .service
            .list_signature_types()
            .await
            .data
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Sigma", "Snort", "YARA"]);
    }

    #[tokio::test]
    async fn test_new_record_survives_retry_after_propagation() {
        let h = harness_with_resolver(|store| {
            Arc::new(EditsWatchedOnce {
                inner: StoreResolver::new(store.clone()),
                store,
                watched: content_hash(b"rule v2 {}"),
                fired: AtomicBool::new(false),
            }) as Arc<dyn RelationshipResolver>
        })
        .await;
        let v1 = submit(&h, "rule v1 {}").await;
        let other = submit(&h, "rule other {}").await;
        h.service
            .relate(&v1.id, SIGNATURE_TYPE, &other.id, "Related To", None, &analyst())
            .await;

        let mut next = Submission::new("rule v2 {}", "OSINT", "T2", "YARA");
        next.link_id = Some(v1.link_id.clone());
        next.copy_relationships = true;
        next.buckets = Some(TagInput::Csv("apt9".into()));
        let out = h.service.submit_record(&next, &analyst()).await;
        assert!(out.success, "{:?}", out.message);
        let out = out.data.unwrap();
        assert!(out.created);
        assert_eq!(out.version, 2);

        let stored = h.store.get(&out.id).await.unwrap().unwrap();
        assert_eq!(stored.sources.len(), 1);
        assert_eq!(stored.sources[0].instances.len(), 1);
        assert!(stored.bucket_list.contains(&"apt9".to_string()));
        assert!(stored.bucket_list.contains(&"concurrent".to_string()));
        assert_eq!(stored.relationships.len(), 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(h.triage.submitted().contains(&out.id));
    }

    #[tokio::test]
    async fn test_resubmission_with_new_link_moves_chain() {
        let h = harness().await;
        let root = submit(&h, "rule root {}").await;
        let stray = submit(&h, "rule stray {}").await;
        assert_eq!(stray.version, 1);

        let mut again = Submission::new("rule stray {}", "Partner", "ignored", "YARA");
        again.link_id = Some(root.link_id.clone());
        let out = h.service.submit_record(&again, &analyst()).await.data.unwrap();
        assert_eq!(out.id, stray.id);
        assert!(!out.created);
        assert_eq!(out.link_id, root.link_id);
        assert_eq!(out.version, 2);

        let versions: Vec<(u32, String)> = h
            .service
            .list_versions(&root.id)
            .await
            .data
            .unwrap()
            .into_iter()
            .map(|v| (v.version, v.link))
            .collect();
        assert_eq!(versions, vec![(1, root.id.clone()), (2, stray.id.clone())]);
        assert!(h.store.chain_members(&stray.link_id).await.unwrap().is_empty());

        let moved = h.store.get(&stray.id).await.unwrap().unwrap();
        assert_eq!(moved.title, "T1");
        assert_eq!(moved.source_names().collect::<Vec<_>>(), vec!["OSINT", "Partner"]);
    }

    #[tokio::test]
    async fn test_seed_types_skips_known() {
        let h = harness().await;
        let names = vec!["YARA".to_string(), " Bro ".to_string(), String::new()];
        assert_eq!(h.service.seed_types(&names).await.unwrap(), 1);
        assert!(h.store.get_type("Bro").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_lookup_by_link_and_version() {
        let h = harness().await;
        let root = submit(&h, "rule l1 {}").await;
        let mut sub = Submission::new("rule l2 {}", "OSINT", "T", "YARA");
        sub.link_id = Some(root.link_id.clone());
        let v2 = h.service.submit_record(&sub, &analyst()).await.data.unwrap();

        assert_eq!(h.service.id_from_link_and_version(&root.link_id, 2).await.data, Some(v2.id));
        assert!(h.service.id_from_link_and_version(&root.link_id, 9).await.is_not_found());
        assert!(h.service.list_versions("missing").await.is_not_found());
    }
}
