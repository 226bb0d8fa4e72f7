//! Incident-History Service Client
//!
//! Returns the most recent incident records matching a site-type filter,
//! bounded by a result count. Non-critical context: the collector degrades
//! to an empty list when this service fails.

use async_trait::async_trait;

use super::http::{build_client, get_json};
use super::IncidentHistoryService;
use crate::config::ServiceConfig;
use crate::types::{IncidentRecord, Result};

pub struct HttpIncidentHistoryService {
    base: String,
    client: reqwest::Client,
}

impl HttpIncidentHistoryService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            base: config.incidents_base.trim_end_matches('/').to_string(),
            client: build_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl IncidentHistoryService for HttpIncidentHistoryService {
    async fn recent_incidents(
        &self,
        site_type: &str,
        limit: usize,
    ) -> Result<Vec<IncidentRecord>> {
        let url = format!("{}/incidents", self.base);
        get_json(
            &self.client,
            "incidents",
            &url,
            &[
                ("site_type", site_type.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }
}
