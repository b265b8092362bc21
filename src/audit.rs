use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::config::Config;

const EXPLORER_BASE: &str = "https://explorer.solana.com/tx";

/// SHA-256 over the compact JSON of `value` with object keys sorted at every depth.
pub fn content_hash(value: &Value) -> String {
    let canonical = canonicalize(value);
    let digest = Sha256::digest(canonical.to_string().as_bytes());
    hex::encode(digest)
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key.clone(), canonicalize(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReceipt {
    pub success: bool,
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LedgerReceipt {
    fn fallback(hash: String, error: &PublishError) -> Self {
        Self {
            success: false,
            hash,
            signature: None,
            explorer_url: None,
            timestamp: None,
            error: Some(error.to_string()),
            message: Some(
                "Hash generated but ledger publishing failed. Data integrity preserved."
                    .to_string(),
            ),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("ledger relay request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ledger relay response had no signature")]
    MissingSignature,
}

/// Anchors a report's content hash somewhere tamper-evident.
///
/// Implementations never fail outright: when the ledger is unreachable they still return a receipt
/// carrying the locally computed hash with `success == false`.
#[async_trait]
pub trait AuditPublisher: Send + Sync {
    async fn publish(&self, report: &Value) -> LedgerReceipt;
}

fn explorer_url(signature: &str, cluster: &str) -> String {
    format!("{EXPLORER_BASE}/{signature}?cluster={cluster}")
}

/// Offline publisher that fabricates a deterministic mock signature.
#[derive(Debug, Clone)]
pub struct LocalPublisher {
    cluster: String,
}

impl LocalPublisher {
    pub fn new(cluster: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
        }
    }
}

#[async_trait]
impl AuditPublisher for LocalPublisher {
    async fn publish(&self, report: &Value) -> LedgerReceipt {
        let hash = content_hash(report);
        let signature = format!("MOCK_{}", &hash[..16]);
        LedgerReceipt {
            success: true,
            explorer_url: Some(explorer_url(&signature, &self.cluster)),
            signature: Some(signature),
            hash,
            timestamp: None,
            error: None,
            message: Some(
                "Mock transaction (set LEDGER_RELAY_URL for real ledger publishing)".to_string(),
            ),
        }
    }
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    hash: &'a str,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    signature: Option<String>,
}

/// Publishes hashes through an HTTP relay that owns the signing key and submits the memo
/// transaction.
#[derive(Debug, Clone)]
pub struct RelayPublisher {
    http: reqwest::Client,
    relay_url: String,
    cluster: String,
}

impl RelayPublisher {
    pub fn new(relay_url: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            relay_url: relay_url.into(),
            cluster: cluster.into(),
        }
    }

    async fn submit(&self, hash: &str) -> Result<String, PublishError> {
        let response: RelayResponse = self
            .http
            .post(&self.relay_url)
            .json(&RelayRequest { hash })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.signature.ok_or(PublishError::MissingSignature)
    }
}

#[async_trait]
impl AuditPublisher for RelayPublisher {
    async fn publish(&self, report: &Value) -> LedgerReceipt {
        let hash = content_hash(report);
        match self.submit(&hash).await {
            Ok(signature) => LedgerReceipt {
                success: true,
                hash,
                explorer_url: Some(explorer_url(&signature, &self.cluster)),
                signature: Some(signature),
                timestamp: Some(Utc::now().to_rfc3339()),
                error: None,
                message: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, relay = %self.relay_url, "ledger publish failed");
                LedgerReceipt::fallback(hash, &err)
            }
        }
    }
}

pub fn publisher_from_config(config: &Config) -> Arc<dyn AuditPublisher> {
    match &config.ledger_relay_url {
        Some(url) => Arc::new(RelayPublisher::new(url.clone(), config.ledger_cluster.clone())),
        None => Arc::new(LocalPublisher::new(config.ledger_cluster.clone())),
    }
}
