//! Thin client for the Customer.io Track API.
//!
//! Each call sends the caller's JSON payload to one endpoint and reports
//! success or the provider's error message. There is no retry and no batching.

pub mod error;
mod types;

pub use error::{CustomerIoError, Result};

use std::time::Duration;

use reqwest::{Method, Url};
use serde_json::{Map, Value};
use types::ErrorBody;

pub const DEFAULT_TRACK_URL: &str = "https://track.customer.io/api/v1";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct CustomerIoClient {
    client: reqwest::Client,
    base_url: Url,
    site_id: String,
    api_key: String,
}

impl std::fmt::Debug for CustomerIoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerIoClient")
            .field("base_url", &self.base_url.as_str())
            .field("site_id", &self.site_id)
            .finish_non_exhaustive()
    }
}

impl CustomerIoClient {
    pub fn new(site_id: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(DEFAULT_TRACK_URL)?,
            site_id: site_id.into(),
            api_key: api_key.into(),
        })
    }

    /// Point the client at a different Track API root (EU region, test stub).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Create or update a customer profile. `request` must carry a string `id`.
    pub async fn add_customer(&self, request: &Map<String, Value>) -> Result<()> {
        let id = customer_id(request)?;
        let url = self.endpoint(&["customers", id])?;
        self.send(Method::PUT, url, request).await
    }

    /// Record an event against a known customer. `request` carries the
    /// customer `id` plus the event body (`name`, `data`).
    pub async fn track_customer_event(&self, request: &Map<String, Value>) -> Result<()> {
        let id = customer_id(request)?;
        let url = self.endpoint(&["customers", id, "events"])?;

        let mut body = request.clone();
        body.remove("id");
        self.send(Method::POST, url, &body).await
    }

    /// Record an event not attributed to any customer.
    pub async fn track_anonymous_event(&self, request: &Map<String, Value>) -> Result<()> {
        let url = self.endpoint(&["events"])?;
        self.send(Method::POST, url, request).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CustomerIoError::InvalidRequest(format!(
                    "base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, body: &Map<String, Value>) -> Result<()> {
        tracing::debug!(method = %method, path = url.path(), "Customer.io request");

        let resp = self
            .client
            .request(method, url)
            .basic_auth(&self.site_id, Some(&self.api_key))
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CustomerIoError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        Ok(())
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    Url::parse(raw)
        .map_err(|e| CustomerIoError::InvalidRequest(format!("invalid base URL {raw}: {e}")))
}

fn customer_id(request: &Map<String, Value>) -> Result<&str> {
    match request.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(CustomerIoError::InvalidRequest(
            "request is missing a customer id".to_string(),
        )),
    }
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Some(message) = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
    {
        return message;
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn endpoint_appends_segments_and_encodes_id() {
        let client = CustomerIoClient::new("site", "key")
            .unwrap()
            .with_base_url("https://track.example.com/api/v1/")
            .unwrap();

        let url = client.endpoint(&["customers", "a b/c", "events"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://track.example.com/api/v1/customers/a%20b%2Fc/events"
        );
    }

    #[test]
    fn customer_id_rejects_missing_and_empty() {
        assert!(customer_id(&map(json!({}))).is_err());
        assert!(customer_id(&map(json!({"id": ""}))).is_err());
        assert!(customer_id(&map(json!({"id": 42}))).is_err());
        assert_eq!(customer_id(&map(json!({"id": "u1"}))).unwrap(), "u1");
    }

    #[test]
    fn error_message_prefers_meta_error() {
        let status = reqwest::StatusCode::BAD_REQUEST;
        assert_eq!(
            error_message(status, r#"{"meta":{"error":"bad email"}}"#),
            "bad email"
        );
        assert_eq!(
            error_message(status, r#"{"meta":{"errors":["a","b"]}}"#),
            "a; b"
        );
        assert_eq!(error_message(status, "plain failure\n"), "plain failure");
        assert_eq!(error_message(status, ""), "Bad Request");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = CustomerIoClient::new("site", "secret-key").unwrap();
        let rendered = format!("{client:?}");
        assert!(rendered.contains("site"));
        assert!(!rendered.contains("secret-key"));
    }
}
