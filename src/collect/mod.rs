//! Context Collection
//!
//! Assembles a [`SiteContext`] snapshot before any analysis stage runs.
//! Location resolution happens first since the weather calls need the
//! coordinates; the remaining fetches run concurrently. Incident history is
//! advisory context, so a failure there degrades to an empty list instead
//! of failing the run.

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::CollectionConfig;
use crate::services::{SharedIncidents, SharedSchedule, SharedSiteInfo, SharedWeather};
use crate::types::{Result, SiteContext, WardenError};

pub struct ContextCollector {
    weather: SharedWeather,
    site_info: SharedSiteInfo,
    schedule: SharedSchedule,
    incidents: SharedIncidents,
    max_incidents: usize,
    forecast_entries: usize,
}

impl ContextCollector {
    pub fn new(
        weather: SharedWeather,
        site_info: SharedSiteInfo,
        schedule: SharedSchedule,
        incidents: SharedIncidents,
        config: &CollectionConfig,
    ) -> Self {
        Self {
            weather,
            site_info,
            schedule,
            incidents,
            max_incidents: config.max_incidents,
            forecast_entries: config.forecast_entries,
        }
    }

    /// Collect everything known about a site right now.
    ///
    /// Weather, forecast, and schedule are required; a failure in any of
    /// them aborts collection. Incident history is optional.
    pub async fn collect(&self, site_id: &str) -> Result<SiteContext> {
        let location = self
            .site_info
            .site_info(site_id)
            .await
            .map_err(|e| required("site_info", e))?;
        debug!(site_id, site_type = %location.site_type, "resolved site location");

        let as_of = Utc::now();
        let (weather, forecast, tasks, incidents) = tokio::join!(
            self.weather.current(location.latitude, location.longitude),
            self.weather
                .forecast(location.latitude, location.longitude, self.forecast_entries),
            self.schedule.scheduled_tasks(site_id, as_of.date_naive()),
            self.incidents
                .recent_incidents(&location.site_type, self.max_incidents),
        );

        let weather = weather.map_err(|e| required("weather", e))?;
        let forecast = forecast.map_err(|e| required("forecast", e))?;
        let tasks = tasks.map_err(|e| required("schedule", e))?;

        let recent_incidents = match incidents {
            Ok(records) => records,
            Err(e) => {
                warn!(site_id, error = %e, "incident history unavailable, continuing without it");
                Vec::new()
            }
        };

        debug!(
            site_id,
            tasks = tasks.len(),
            incidents = recent_incidents.len(),
            "context collected"
        );

        Ok(SiteContext {
            site_id: site_id.to_string(),
            as_of,
            location,
            weather,
            forecast,
            tasks,
            recent_incidents,
        })
    }
}

fn required(source: &str, err: WardenError) -> WardenError {
    WardenError::collection(source, err.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::services::{
        IncidentHistoryService, SiteInfoService, TaskScheduleService, WeatherService,
    };
    use crate::types::{IncidentRecord, ScheduledTask, SiteLocation, WeatherObservation};

    fn observation() -> WeatherObservation {
        WeatherObservation {
            temperature_f: 68.0,
            humidity: 40.0,
            wind_speed_mph: 8.0,
            conditions: "Clear".to_string(),
            precipitation: false,
        }
    }

    struct FakeWeather;

    #[async_trait]
    impl WeatherService for FakeWeather {
        async fn current(&self, _lat: f64, _lon: f64) -> Result<WeatherObservation> {
            Ok(observation())
        }

        async fn forecast(
            &self,
            _lat: f64,
            _lon: f64,
            entries: usize,
        ) -> Result<Vec<WeatherObservation>> {
            Ok(vec![observation(); entries])
        }
    }

    struct FakeSiteInfo;

    #[async_trait]
    impl SiteInfoService for FakeSiteInfo {
        async fn site_info(&self, site_id: &str) -> Result<SiteLocation> {
            Ok(SiteLocation {
                name: format!("Site {}", site_id),
                address: "1 Main St".to_string(),
                latitude: 40.7,
                longitude: -74.0,
                site_type: "commercial-highrise".to_string(),
            })
        }
    }

    struct FakeSchedule {
        fail: bool,
    }

    #[async_trait]
    impl TaskScheduleService for FakeSchedule {
        async fn scheduled_tasks(
            &self,
            _site_id: &str,
            _date: NaiveDate,
        ) -> Result<Vec<ScheduledTask>> {
            if self.fail {
                return Err(WardenError::service("schedule", "connection refused"));
            }
            Ok(vec![ScheduledTask {
                task_type: "Roofing".to_string(),
                description: "Membrane installation".to_string(),
                crew_size: Some(4),
            }])
        }
    }

    struct FakeIncidents {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IncidentHistoryService for FakeIncidents {
        async fn recent_incidents(
            &self,
            _site_type: &str,
            limit: usize,
        ) -> Result<Vec<IncidentRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(WardenError::service("incidents", "timeout"));
            }
            Ok(vec![
                IncidentRecord {
                    description: "Fall from scaffold".to_string(),
                    severity: "Serious".to_string(),
                    occurred_at: Utc::now(),
                };
                limit.min(2)
            ])
        }
    }

    fn collector(schedule_fail: bool, incidents_fail: bool) -> ContextCollector {
        ContextCollector::new(
            Arc::new(FakeWeather),
            Arc::new(FakeSiteInfo),
            Arc::new(FakeSchedule {
                fail: schedule_fail,
            }),
            Arc::new(FakeIncidents {
                fail: incidents_fail,
                calls: AtomicUsize::new(0),
            }),
            &CollectionConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_collects_full_context() {
        let ctx = collector(false, false).collect("site-7").await.unwrap();
        assert_eq!(ctx.site_id, "site-7");
        assert_eq!(ctx.location.site_type, "commercial-highrise");
        assert_eq!(ctx.tasks.len(), 1);
        assert_eq!(ctx.recent_incidents.len(), 2);
        assert_eq!(ctx.work_type(), "Roofing");
    }

    #[tokio::test]
    async fn test_incident_failure_degrades_to_empty() {
        let ctx = collector(false, true).collect("site-7").await.unwrap();
        assert!(ctx.recent_incidents.is_empty());
        assert_eq!(ctx.tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_schedule_failure_aborts_collection() {
        let err = collector(true, false).collect("site-7").await.unwrap_err();
        match err {
            WardenError::Collection { source_name, .. } => {
                assert_eq!(source_name, "schedule");
            }
            other => panic!("expected collection error, got {:?}", other),
        }
    }
}
