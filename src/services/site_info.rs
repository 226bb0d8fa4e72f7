//! Site-Info Service Client
//!
//! Resolves a site identifier to its location record (name, address,
//! coordinates, site-type classification).

use async_trait::async_trait;

use super::http::{build_client, get_json};
use super::SiteInfoService;
use crate::config::ServiceConfig;
use crate::types::{Result, SiteLocation};

pub struct HttpSiteInfoService {
    base: String,
    client: reqwest::Client,
}

impl HttpSiteInfoService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            base: config.site_info_base.trim_end_matches('/').to_string(),
            client: build_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl SiteInfoService for HttpSiteInfoService {
    async fn site_info(&self, site_id: &str) -> Result<SiteLocation> {
        let url = format!("{}/sites/{}", self.base, site_id);
        get_json(&self.client, "site_info", &url, &[]).await
    }
}
