use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::StatusResult;

const USER_AGENT: &str = "toggl-track-sync";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client")
}

pub fn parse_json<T: DeserializeOwned>(service: &'static str, response: Response) -> Result<T, ApiError> {
    let status = response.status();

    if status == 401 || status == 403 {
        return Err(ApiError::Unauthorized { service });
    }

    if status == 402 {
        return Err(ApiError::PaymentRequired { service });
    }

    if status == 429 {
        return Err(ApiError::RateLimited { service });
    }

    if status.is_server_error() {
        return Err(ApiError::Server {
            service,
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        });
    }

    if !status.is_success() {
        return Err(ApiError::Http {
            service,
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        });
    }

    response
        .json::<T>()
        .map_err(|err| ApiError::Decode(err.to_string()))
}

/// Mutations are judged by the caller, so any status is passed through.
pub fn into_status(response: Response) -> StatusResult {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    StatusResult { status, body }
}

pub fn network(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}
