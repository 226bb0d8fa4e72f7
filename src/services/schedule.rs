//! Task-Schedule Service Client

use async_trait::async_trait;
use chrono::NaiveDate;

use super::http::{build_client, get_json};
use super::TaskScheduleService;
use crate::config::ServiceConfig;
use crate::types::{Result, ScheduledTask};

pub struct HttpTaskScheduleService {
    base: String,
    client: reqwest::Client,
}

impl HttpTaskScheduleService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            base: config.schedule_base.trim_end_matches('/').to_string(),
            client: build_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl TaskScheduleService for HttpTaskScheduleService {
    async fn scheduled_tasks(&self, site_id: &str, date: NaiveDate) -> Result<Vec<ScheduledTask>> {
        let url = format!("{}/sites/{}/tasks", self.base, site_id);
        get_json(
            &self.client,
            "schedule",
            &url,
            &[("date", date.format("%Y-%m-%d").to_string())],
        )
        .await
    }
}
