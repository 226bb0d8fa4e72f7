//! External Collaborator Clients
//!
//! Thin clients for the boundary services the pipeline depends on: weather,
//! site info, task schedule, incident history, and the analysis store. Each
//! sits behind an async trait so the collector and tests can substitute
//! in-memory fakes. All boundary protocols are plain JSON over HTTP; the
//! exact schemas are the services' concern.

mod http;
mod incidents;
mod schedule;
mod site_info;
mod store;
mod weather;

pub use incidents::HttpIncidentHistoryService;
pub use schedule::HttpTaskScheduleService;
pub use site_info::HttpSiteInfoService;
pub use store::{
    AnalysisRecord, HttpAnalysisStore, SharedStore, init_shared_store, shared_store,
};
pub use weather::HttpWeatherService;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::{
    IncidentRecord, Result, SafetyReport, ScheduledTask, SiteLocation, WeatherObservation,
};

/// Weather/forecast service: current conditions and a short forecast set
#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherObservation>;

    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        entries: usize,
    ) -> Result<Vec<WeatherObservation>>;
}

/// Geolocation/site-info service: site identifier to location record
#[async_trait]
pub trait SiteInfoService: Send + Sync {
    async fn site_info(&self, site_id: &str) -> Result<SiteLocation>;
}

/// Task-schedule service: scheduled task records for a site and day
#[async_trait]
pub trait TaskScheduleService: Send + Sync {
    async fn scheduled_tasks(&self, site_id: &str, date: NaiveDate) -> Result<Vec<ScheduledTask>>;
}

/// Incident-history service: most recent incidents matching a site type
#[async_trait]
pub trait IncidentHistoryService: Send + Sync {
    async fn recent_incidents(&self, site_type: &str, limit: usize)
    -> Result<Vec<IncidentRecord>>;
}

/// Persistence/analysis-history service
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Append one analysis record. Stage executions log through this
    /// fire-and-forget; a failure here never fails a stage.
    async fn save_analysis(&self, record: &AnalysisRecord) -> Result<()>;

    /// Store a completed report
    async fn save_report(&self, report: &SafetyReport) -> Result<()>;

    /// Retrieve a previously stored report by id
    async fn fetch_report(&self, report_id: &str) -> Result<Option<SafetyReport>>;
}

pub type SharedWeather = Arc<dyn WeatherService>;
pub type SharedSiteInfo = Arc<dyn SiteInfoService>;
pub type SharedSchedule = Arc<dyn TaskScheduleService>;
pub type SharedIncidents = Arc<dyn IncidentHistoryService>;
