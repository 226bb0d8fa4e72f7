//! Shared HTTP plumbing for service clients.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::types::{Result, WardenError};

/// Build a client with the service-fetch timeout applied
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| WardenError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// GET a JSON document, mapping transport and status failures to a
/// service error tagged with the collaborator's name.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    service: &str,
    url: &str,
    query: &[(&str, String)],
) -> Result<T> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| WardenError::service(service, format!("request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(WardenError::service(
            service,
            format!("unexpected status {} from {}", status, url),
        ));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| WardenError::service(service, format!("invalid response body: {}", e)))
}
