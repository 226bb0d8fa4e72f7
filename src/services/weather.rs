//! Weather Service Client
//!
//! Fetches current conditions and a short forecast for a coordinate pair.

use async_trait::async_trait;

use super::http::{build_client, get_json};
use super::WeatherService;
use crate::config::ServiceConfig;
use crate::types::{Result, WeatherObservation};

pub struct HttpWeatherService {
    base: String,
    client: reqwest::Client,
}

impl HttpWeatherService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            base: config.weather_base.trim_end_matches('/').to_string(),
            client: build_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl WeatherService for HttpWeatherService {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherObservation> {
        let url = format!("{}/current", self.base);
        get_json(
            &self.client,
            "weather",
            &url,
            &[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ],
        )
        .await
    }

    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        entries: usize,
    ) -> Result<Vec<WeatherObservation>> {
        let url = format!("{}/forecast", self.base);
        get_json(
            &self.client,
            "weather",
            &url,
            &[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("count", entries.to_string()),
            ],
        )
        .await
    }
}
