use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::audit::{AuditPublisher, LedgerReceipt, content_hash};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub hash: String,
    pub data: Value,
    pub blockchain_signature: Option<String>,
    pub blockchain_url: Option<String>,
    pub created_at: String,
}

/// Storage for saved reports, addressable by id or content hash.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn insert(&self, report: Report);
    async fn find(&self, identifier: &str) -> Option<Report>;
}

/// In-process store for development and tests. Reports are never evicted, so the map grows for
/// the life of the server.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: RwLock<HashMap<String, Report>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn insert(&self, report: Report) {
        let mut reports = self.reports.write().unwrap_or_else(|e| e.into_inner());
        reports.insert(report.id.clone(), report);
    }

    async fn find(&self, identifier: &str) -> Option<Report> {
        let reports = self.reports.read().unwrap_or_else(|e| e.into_inner());
        reports.get(identifier).cloned().or_else(|| {
            reports
                .values()
                .filter(|r| r.hash == identifier)
                .min_by(|a, b| a.created_at.cmp(&b.created_at))
                .cloned()
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedReport {
    pub success: bool,
    pub report: Report,
    pub blockchain: LedgerReceipt,
}

/// Hashes, publishes and stores reports.
#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    publisher: Arc<dyn AuditPublisher>,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>, publisher: Arc<dyn AuditPublisher>) -> Self {
        Self { store, publisher }
    }

    pub async fn save(&self, data: Value) -> SavedReport {
        let hash = content_hash(&data);
        let blockchain = self.publisher.publish(&data).await;

        let report = Report {
            id: Uuid::new_v4().to_string(),
            hash,
            data,
            blockchain_signature: blockchain.signature.clone(),
            blockchain_url: blockchain.explorer_url.clone(),
            created_at: Utc::now().to_rfc3339(),
        };
        self.store.insert(report.clone()).await;

        tracing::info!(
            report_id = %report.id,
            hash = %report.hash,
            published = blockchain.success,
            "report saved"
        );

        SavedReport {
            success: true,
            report,
            blockchain,
        }
    }

    pub async fn find(&self, identifier: &str) -> Option<Report> {
        self.store.find(identifier).await
    }
}
