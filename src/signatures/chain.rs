//! Version chains: records sharing a `link_id` are successive revisions of
//! one logical document.
//!
//! Each chain keeps a persisted counter under `sig/chain/{segment}`. A record
//! joining a chain claims `counter + 1` inside the same delta that writes
//! the record, so two submissions into one chain can never share a number.
//! Membership is indexed under `sig/link/{segment}:{id}`.
//!
//! `segment` is the blake3 hex of the link ID. Link IDs are caller supplied
//! and may contain `:` or `/`; the fixed-width segment keeps one chain's
//! prefix scan from reaching into another's.

use anyhow::{anyhow, Context, Result};
use cnidarium::{Snapshot, StateDelta, StateRead, StateWrite};
use futures::StreamExt;
use tracing::warn;

use super::error::{OpResult, SigResult, SignatureError};
use super::store::{read_json, record_key, SignatureStore};
use super::types::{SigId, Signature, VersionEntry};
use super::SignatureService;

pub(crate) const LINK_PREFIX: &str = "sig/link";
pub(crate) const CHAIN_PREFIX: &str = "sig/chain";

fn link_segment(link_id: &str) -> String {
    blake3::hash(link_id.as_bytes()).to_hex().to_string()
}
fn link_prefix(link_id: &str) -> String {
    format!("{}/{}:", LINK_PREFIX, link_segment(link_id))
}
fn link_key(link_id: &str, id: &str) -> String {
    format!("{}{}", link_prefix(link_id), id)
}
fn chain_key(link_id: &str) -> String {
    format!("{}/{}", CHAIN_PREFIX, link_segment(link_id))
}

fn decode_counter(bytes: &[u8]) -> Result<u32> {
    let raw: [u8; 4] = bytes
        .try_into()
        .map_err(|_| anyhow!("corrupt chain counter ({} bytes)", bytes.len()))?;
    Ok(u32::from_be_bytes(raw))
}

/// Bump the chain counter in `delta` and return the claimed version.
pub(crate) async fn claim_next_version(
    delta: &mut StateDelta<Snapshot>,
    link_id: &str,
) -> Result<u32> {
    let current = match delta.get_raw(&chain_key(link_id)).await? {
        Some(bytes) => decode_counter(&bytes)?,
        None => 0,
    };
    let next = current
        .checked_add(1)
        .context("chain version counter overflow")?;
    delta.put_raw(chain_key(link_id), next.to_be_bytes().to_vec());
    Ok(next)
}

pub(crate) fn join(delta: &mut StateDelta<Snapshot>, link_id: &str, id: &str) {
    delta.put_raw(link_key(link_id, id), id.as_bytes().to_vec());
}

pub(crate) fn leave(delta: &mut StateDelta<Snapshot>, link_id: &str, id: &str) {
    delta.delete(link_key(link_id, id));
}

impl SignatureStore {
    /// Live records in a chain, ordered by version.
    pub async fn chain_members(&self, link_id: &str) -> Result<Vec<Signature>> {
        let snapshot = self.snapshot();
        let mut stream = snapshot.prefix_raw(&link_prefix(link_id));
        let mut ids = Vec::new();

        while let Some(entry) = stream.next().await {
            match entry {
                Ok((_key, value)) => match String::from_utf8(value) {
                    Ok(id) => ids.push(id),
                    Err(e) => warn!(link_id, "Skipping corrupt chain index entry: {}", e),
                },
                Err(e) => {
                    warn!("Error reading chain index: {}", e);
                }
            }
        }

        let mut members = Vec::with_capacity(ids.len());
        for id in ids {
            match read_json::<_, Signature>(&snapshot, &record_key(&id)).await? {
                Some(sig) => members.push(sig),
                None => warn!(link_id, sig_id = %id, "chain index points at missing record"),
            }
        }
        members.sort_by_key(|s| s.version);
        Ok(members)
    }

    /// The chain's lowest live version.
    pub async fn first_in_chain(&self, link_id: &str) -> Result<Option<Signature>> {
        Ok(self.chain_members(link_id).await?.into_iter().next())
    }

    pub async fn chain_len(&self, link_id: &str) -> Result<usize> {
        Ok(self.chain_members(link_id).await?.len())
    }

    pub async fn id_from_link_and_version(
        &self,
        link_id: &str,
        version: u32,
    ) -> Result<Option<SigId>> {
        Ok(self
            .chain_members(link_id)
            .await?
            .into_iter()
            .find(|s| s.version == version)
            .map(|s| s.id))
    }
}

impl SignatureService {
    /// Every version in the chain of record `id`, ordered by version.
    pub async fn list_versions(&self, id: &str) -> OpResult<Vec<VersionEntry>> {
        self.try_list_versions(id).await.into()
    }

    async fn try_list_versions(&self, id: &str) -> SigResult<Vec<VersionEntry>> {
        let sig = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| SignatureError::NotFound(format!("Signature {} not found.", id)))?;
        let versions = self
            .store
            .chain_members(&sig.link_id)
            .await?
            .into_iter()
            .map(|s| VersionEntry {
                title: s.title,
                version: s.version,
                data: s.data,
                link: s.id,
            })
            .collect();
        Ok(versions)
    }

    pub async fn id_from_link_and_version(&self, link_id: &str, version: u32) -> OpResult<SigId> {
        self.try_id_from_link_and_version(link_id, version)
            .await
            .into()
    }

    async fn try_id_from_link_and_version(&self, link_id: &str, version: u32) -> SigResult<SigId> {
        self.store
            .id_from_link_and_version(link_id, version)
            .await?
            .ok_or_else(|| {
                SignatureError::NotFound(format!("No version {} in chain {}.", version, link_id))
            })
    }
}
