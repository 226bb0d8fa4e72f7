//! Analysis Store Client
//!
//! Persists stage-level analysis records and completed reports. A single
//! shared handle is installed once at startup and reused for the life of
//! the process, so background history writes never race a reconnect.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::http::build_client;
use super::AnalysisStore;
use crate::config::ServiceConfig;
use crate::types::{Result, SafetyReport, WardenError};

pub type SharedStore = Arc<dyn AnalysisStore>;

static STORE: OnceLock<SharedStore> = OnceLock::new();

/// Install the process-wide analysis store. Later calls are ignored, the
/// first installed handle wins.
pub fn init_shared_store(store: SharedStore) {
    let _ = STORE.set(store);
}

/// The process-wide analysis store, if one has been installed.
pub fn shared_store() -> Option<SharedStore> {
    STORE.get().cloned()
}

/// One stage execution logged for audit: which site, which stage, what was
/// asked, and what came back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub site_id: String,
    pub stage: String,
    pub query: String,
    pub response: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

pub struct HttpAnalysisStore {
    base: String,
    client: reqwest::Client,
}

impl HttpAnalysisStore {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            base: config.store_base.trim_end_matches('/').to_string(),
            client: build_client(config.timeout_secs)?,
        })
    }

    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<()> {
        let url = format!("{}/{}", self.base, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| WardenError::service("store", format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(WardenError::service(
                "store",
                format!("unexpected status {} from {}", response.status(), url),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AnalysisStore for HttpAnalysisStore {
    async fn save_analysis(&self, record: &AnalysisRecord) -> Result<()> {
        self.post_json("analyses", record).await
    }

    async fn save_report(&self, report: &SafetyReport) -> Result<()> {
        self.post_json("reports", report).await
    }

    async fn fetch_report(&self, report_id: &str) -> Result<Option<SafetyReport>> {
        let url = format!("{}/reports/{}", self.base, report_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WardenError::service("store", format!("request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(WardenError::service(
                "store",
                format!("unexpected status {} from {}", response.status(), url),
            ));
        }

        let report = response
            .json::<SafetyReport>()
            .await
            .map_err(|e| WardenError::service("store", format!("invalid response body: {}", e)))?;
        Ok(Some(report))
    }
}
