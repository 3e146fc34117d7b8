use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::dates::{format_date, SyncWindow};
use crate::error::ApiError;
use crate::http::{self, network};
use crate::models::{TimeEntry, TogglUser};
use crate::tracker::TimeTracker;

const SERVICE: &str = "Toggl";

#[derive(Clone)]
pub struct TogglClient {
    client: Client,
    base_url: String,
    endpoint: String,
    token: String,
}

impl TogglClient {
    pub fn new(endpoint: &str, token: String) -> Self {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        Self {
            client: http::build_client(),
            base_url: format!("{endpoint}/api/v9"),
            endpoint,
            token,
        }
    }

    fn authorization(&self) -> String {
        let credentials = STANDARD.encode(format!("{}:api_token", self.token));
        format!("Basic {}", credentials)
    }

    fn fetch<T: DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .header("Authorization", self.authorization())
            .send()
            .map_err(network)?;
        http::parse_json(SERVICE, response)
    }
}

impl TimeTracker for TogglClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authenticate(&self) -> Result<TogglUser, ApiError> {
        self.fetch(format!("{}/me", self.base_url))
    }

    fn time_entries(&self, window: &SyncWindow) -> Result<Vec<TimeEntry>, ApiError> {
        let start = format_date(window.from_date());
        let end = format_date(window.to_date());
        let url = reqwest::Url::parse_with_params(
            &format!("{}/me/time_entries", self.base_url),
            &[("start_date", start.as_str()), ("end_date", end.as_str())],
        )
        .map_err(|err| ApiError::Network(err.to_string()))?;
        self.fetch(url.to_string())
    }
}
