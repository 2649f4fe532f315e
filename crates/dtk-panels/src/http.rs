//! Shared HTTP client for the API-backed panels.

use dtk_core::FetchError;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("dev-toolkit/", env!("CARGO_PKG_VERSION"));

/// JSON-over-HTTP client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Creates a client sending the toolkit user agent.
    pub fn new() -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Build `base` + `path` with the given query parameters.
    pub fn url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, FetchError> {
        let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
        Url::parse_with_params(&joined, params)
            .map_err(|e| FetchError::Network(format!("invalid URL '{joined}': {e}")))
    }

    /// GET `url` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        tracing::debug!(host = url.host_str().unwrap_or_default(), path = url.path(), "GET");

        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

fn transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Network(format!("request timed out: {error}"))
    } else if error.is_decode() {
        FetchError::Decode(error.to_string())
    } else {
        FetchError::Network(error.to_string())
    }
}

fn status_error(status: StatusCode, body: &str) -> FetchError {
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    } else {
        body.trim().chars().take(200).collect()
    };
    FetchError::Status {
        status: status.as_u16(),
        message,
    }
}
