//! Site Context
//!
//! Snapshot of everything known about a site at analysis time. Assembled
//! fresh per analysis request by the context collector; never persisted by
//! the core. Persistence of completed reports is the analysis store's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions at a site, as reported by the weather service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Temperature in degrees Fahrenheit
    pub temperature_f: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Wind speed in mph
    pub wind_speed_mph: f64,
    /// Free-text condition summary ("Clear", "Light rain", ...)
    pub conditions: String,
    /// Precipitation flag
    #[serde(default)]
    pub precipitation: bool,
}

impl WeatherObservation {
    /// One-line summary used in prompt templates
    pub fn summary(&self) -> String {
        format!(
            "Temp: {:.0}F, Humidity: {:.0}%, Wind: {:.0}mph, Conditions: {}",
            self.temperature_f, self.humidity, self.wind_speed_mph, self.conditions
        )
    }
}

/// Location record returned by the site-info service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteLocation {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Site-type classification ("commercial-highrise", "residential", ...)
    pub site_type: String,
}

/// A task scheduled for the analysis day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub task_type: String,
    pub description: String,
    /// Crew size if the schedule records one
    #[serde(default)]
    pub crew_size: Option<u32>,
}

/// A past incident record relevant to the site type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub description: String,
    pub severity: String,
    pub occurred_at: DateTime<Utc>,
}

/// Everything known about a site at analysis time.
///
/// Owned by a single analysis run; stages read it but never mutate it.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub site_id: String,
    /// Reference timestamp the context was assembled for
    pub as_of: DateTime<Utc>,
    pub location: SiteLocation,
    pub weather: WeatherObservation,
    /// Short-term forecast, soonest first
    pub forecast: Vec<WeatherObservation>,
    /// Tasks scheduled for the analysis day
    pub tasks: Vec<ScheduledTask>,
    /// Recent incidents for this site type, most recent first, bounded
    pub recent_incidents: Vec<IncidentRecord>,
}

impl SiteContext {
    /// Work type inferred from the day's schedule, used to select
    /// trade-specific validation guidance. Falls back to the first task's
    /// type, then to general construction.
    pub fn work_type(&self) -> &str {
        self.tasks
            .first()
            .map(|t| t.task_type.as_str())
            .unwrap_or("General Construction")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation() -> WeatherObservation {
        WeatherObservation {
            temperature_f: 68.0,
            humidity: 40.0,
            wind_speed_mph: 8.0,
            conditions: "Clear".to_string(),
            precipitation: false,
        }
    }

    #[test]
    fn test_weather_summary() {
        assert_eq!(
            observation().summary(),
            "Temp: 68F, Humidity: 40%, Wind: 8mph, Conditions: Clear"
        );
    }

    #[test]
    fn test_work_type_fallback() {
        let ctx = SiteContext {
            site_id: "site-1".to_string(),
            as_of: Utc::now(),
            location: SiteLocation {
                name: "Main St Tower".to_string(),
                address: "1 Main St".to_string(),
                latitude: 0.0,
                longitude: 0.0,
                site_type: "commercial".to_string(),
            },
            weather: observation(),
            forecast: vec![],
            tasks: vec![],
            recent_incidents: vec![],
        };
        assert_eq!(ctx.work_type(), "General Construction");
    }
}
