use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::signatures::types::{Actor, Signature};

/// Downstream analysis of newly created signatures. Dispatch is
/// fire-and-forget: callers never wait on or fail because of it.
#[async_trait]
pub trait AnalysisPipeline: Send + Sync {
    async fn submit(&self, record: &Signature, actor: &Actor) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct TriageRequest<'a> {
    id: &'a str,
    content_hash: &'a str,
    link_id: &'a str,
    version: u32,
    title: &'a str,
    data_type: &'a str,
    analyst: &'a str,
}

/// Posts new signatures to an HTTP analysis service.
pub struct TriageClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl TriageClient {
    /// `None` when `ANALYSIS_URL` is not configured.
    pub fn from_env() -> Result<Option<Self>> {
        let Some(base_url) = dotenv::var("ANALYSIS_URL").ok().filter(|u| !u.is_empty()) else {
            return Ok(None);
        };
        let api_key = dotenv::var("ANALYSIS_API_KEY").ok().filter(|k| !k.is_empty());

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Some(Self {
            client,
            base_url,
            api_key,
        }))
    }

    /// Resolve the submission endpoint from the base URL.
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/triage") {
            base.to_string()
        } else {
            format!("{}/triage", base)
        }
    }
}

#[async_trait]
impl AnalysisPipeline for TriageClient {
    async fn submit(&self, record: &Signature, actor: &Actor) -> Result<()> {
        let body = TriageRequest {
            id: &record.id,
            content_hash: &record.content_hash,
            link_id: &record.link_id,
            version: record.version,
            title: &record.title,
            data_type: &record.data_type,
            analyst: &actor.name,
        };

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let resp = req.send().await.context("Triage request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("Triage service returned {}: {}", status, text);
        }
        info!(sig_id = %record.id, "signature queued for triage");
        Ok(())
    }
}

/// Used when no analysis service is configured.
pub struct LogOnlyTriage;

#[async_trait]
impl AnalysisPipeline for LogOnlyTriage {
    async fn submit(&self, record: &Signature, actor: &Actor) -> Result<()> {
        info!(
            sig_id = %record.id,
            analyst = %actor,
            "no analysis service configured; skipping triage"
        );
        Ok(())
    }
}
