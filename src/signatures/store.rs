use std::path::Path;

use anyhow::{Context, Result};
use cnidarium::{Snapshot, StateDelta, StateRead, StateWrite, Storage};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::chain;
use super::error::{SigResult, SignatureError};
use super::types::{Signature, SignatureType};

// Key prefixes, no trailing slashes
pub(crate) const RECORD_PREFIX: &str = "sig/record";
pub(crate) const HASH_PREFIX: &str = "sig/hash";
pub(crate) const TYPE_PREFIX: &str = "sig/type";

pub(crate) fn record_key(id: &str) -> String {
    format!("{}/{}", RECORD_PREFIX, id)
}
pub(crate) fn hash_key(hash: &str) -> String {
    format!("{}/{}", HASH_PREFIX, hash)
}
fn type_key(name: &str) -> String {
    format!("{}/{}", TYPE_PREFIX, name)
}

/// Read and decode a JSON value from any cnidarium state view.
pub(crate) async fn read_json<S, T>(state: &S, key: &str) -> Result<Option<T>>
where
    S: StateRead,
    T: DeserializeOwned,
{
    match state.get_raw(key).await? {
        Some(bytes) => {
            let value = serde_json::from_slice(&bytes)
                .with_context(|| format!("failed to decode {}", key))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Persistent signature records on top of cnidarium.
///
/// Every write takes `commit_lock` for the whole read-check-write-commit
/// sequence, so each delta is forked from the latest snapshot and the
/// hash-uniqueness and chain-counter checks cannot interleave.
pub struct SignatureStore {
    storage: Storage,
    commit_lock: Mutex<()>,
}

impl SignatureStore {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let prefixes = vec![
            RECORD_PREFIX.to_string(),
            HASH_PREFIX.to_string(),
            chain::LINK_PREFIX.to_string(),
            chain::CHAIN_PREFIX.to_string(),
            TYPE_PREFIX.to_string(),
        ];
        let storage = Storage::load(data_dir.to_path_buf(), prefixes)
            .await
            .context("Failed to init cnidarium storage")?;
        Ok(Self {
            storage,
            commit_lock: Mutex::new(()),
        })
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        self.storage.latest_snapshot()
    }

    pub async fn get(&self, id: &str) -> Result<Option<Signature>> {
        read_json(&self.snapshot(), &record_key(id)).await
    }

    /// Look up the live record owning a content hash.
    pub async fn find_by_hash(&self, hash: &str) -> Result<Option<Signature>> {
        let snapshot = self.snapshot();
        let Some(id) = snapshot.get_raw(&hash_key(hash)).await? else {
            return Ok(None);
        };
        let id = String::from_utf8(id).context("corrupt hash index entry")?;
        read_json(&snapshot, &record_key(&id)).await
    }

    /// Persist `record`, enforcing content-hash uniqueness, the revision
    /// check and chain placement in one commit.
    ///
    /// A record whose `link_id` differs from the stored one (or that was
    /// never stored) joins that chain and is given its next version. On
    /// success `record` is replaced with what was written, revision bumped.
    pub async fn save(&self, record: &mut Signature) -> SigResult<()> {
        validate(record)?;

        let _guard = self.commit_lock.lock().await;
        let mut delta = StateDelta::new(self.snapshot());
        let mut next = record.clone();

        let stored: Option<Signature> = read_json(&delta, &record_key(&record.id)).await?;
        match &stored {
            Some(current) if current.revision != record.revision => {
                return Err(SignatureError::Conflict {
                    id: record.id.clone(),
                    expected: record.revision,
                    actual: current.revision,
                });
            }
            Some(_) => {}
            None if record.revision != 0 => {
                return Err(SignatureError::NotFound(format!(
                    "Signature {} no longer exists.",
                    record.id
                )));
            }
            None => {
                if let Some(owner) = delta.get_raw(&hash_key(&record.content_hash)).await? {
                    let owner = String::from_utf8(owner).context("corrupt hash index entry")?;
                    if owner != record.id {
                        return Err(SignatureError::Duplicate { existing_id: owner });
                    }
                }
            }
        }

        let previous_link = stored.as_ref().map(|s| s.link_id.as_str());
        if previous_link != Some(next.link_id.as_str()) {
            next.version = chain::claim_next_version(&mut delta, &next.link_id).await?;
            chain::join(&mut delta, &next.link_id, &next.id);
            if let Some(old) = previous_link {
                chain::leave(&mut delta, old, &next.id);
            }
        }
        next.revision += 1;

        delta.put_raw(
            record_key(&next.id),
            serde_json::to_vec(&next).context("serialize signature")?,
        );
        delta.put_raw(hash_key(&next.content_hash), next.id.as_bytes().to_vec());
        self.storage.commit(delta).await?;

        debug!(
            sig_id = %next.id,
            link_id = %next.link_id,
            version = next.version,
            revision = next.revision,
            "signature saved"
        );
        *record = next;
        Ok(())
    }

    /// Load-mutate-save with optimistic retry.
    ///
    /// `mutate` runs against a freshly loaded copy on every attempt. If it
    /// returns an error nothing is written. Returns `mutate`'s value and the
    /// saved record.
    pub async fn update<T, F>(&self, id: &str, retries: u32, mut mutate: F) -> SigResult<(T, Signature)>
    where
        F: FnMut(&mut Signature) -> SigResult<T>,
    {
        let mut attempt = 0;
        loop {
            let mut record = self
                .get(id)
                .await?
                .ok_or_else(|| SignatureError::NotFound(format!("Signature {} not found.", id)))?;
            let out = mutate(&mut record)?;
            match self.save(&mut record).await {
                Ok(()) => return Ok((out, record)),
                Err(e @ SignatureError::Conflict { .. }) if attempt < retries => {
                    attempt += 1;
                    debug!(sig_id = id, attempt, "{}; retrying", e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Remove a record and its index entries. Returns whether it existed.
    ///
    /// The chain counter is left alone so version numbers are never reused.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.commit_lock.lock().await;
        let mut delta = StateDelta::new(self.snapshot());
        let Some(record) = read_json::<_, Signature>(&delta, &record_key(id)).await? else {
            return Ok(false);
        };
        delta.delete(record_key(id));
        delta.delete(hash_key(&record.content_hash));
        chain::leave(&mut delta, &record.link_id, id);
        self.storage.commit(delta).await?;
        debug!(sig_id = id, link_id = %record.link_id, "signature deleted");
        Ok(true)
    }

    pub async fn get_type(&self, name: &str) -> Result<Option<SignatureType>> {
        read_json(&self.snapshot(), &type_key(name)).await
    }

    /// Register a type. Returns false if the name is already taken.
    pub async fn put_type(&self, signature_type: &SignatureType) -> Result<bool> {
        let _guard = self.commit_lock.lock().await;
        let mut delta = StateDelta::new(self.snapshot());
        let key = type_key(&signature_type.name);
        if delta.get_raw(&key).await?.is_some() {
            return Ok(false);
        }
        delta.put_raw(
            key,
            serde_json::to_vec(signature_type).context("serialize signature type")?,
        );
        self.storage.commit(delta).await?;
        debug!(name = %signature_type.name, "signature type registered");
        Ok(true)
    }

    pub async fn list_types(&self) -> Result<Vec<SignatureType>> {
        let snapshot = self.snapshot();
        let mut stream = snapshot.prefix_raw(TYPE_PREFIX);
        let mut results = Vec::new();

        while let Some(entry) = stream.next().await {
            match entry {
                Ok((_key, value)) => match serde_json::from_slice::<SignatureType>(&value) {
                    Ok(t) => results.push(t),
                    Err(e) => warn!("Skipping undecodable signature type: {}", e),
                },
                Err(e) => {
                    warn!("Error reading signature type stream: {}", e);
                }
            }
        }

        results.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(results)
    }
}

/// Schema checks applied before anything is written.
fn validate(record: &Signature) -> SigResult<()> {
    if record.title.trim().is_empty() {
        return Err(SignatureError::Validation("title: Field is required".into()));
    }
    if record.data_type.trim().is_empty() {
        return Err(SignatureError::Validation(
            "data_type: Field is required".into(),
        ));
    }
    if record.link_id.trim().is_empty() {
        return Err(SignatureError::Validation("link_id: Field is required".into()));
    }
    if super::content::content_hash(record.data.as_bytes()) != record.content_hash {
        return Err(SignatureError::Validation(
            "content_hash: does not match data".into(),
        ));
    }
    if let Some(c) = record.inlines.iter().find(|c| c.comment.trim().is_empty()) {
        return Err(SignatureError::Validation(format!(
            "inlines: comment on line {} is empty",
            c.line
        )));
    }
    Ok(())
}
