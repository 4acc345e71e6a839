use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};

/// Persistent connection context: one pooled `reqwest::Client` with the
/// bearer-auth and JSON headers baked in.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
            Error::configuration_with_context(
                "API key contains characters that are not valid in an HTTP header",
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_source("http_transport"),
            )
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One `POST {base}/{path}` attempt.
    ///
    /// Non-2xx answers become `Error::Upstream` with the status and body;
    /// connect/timeout/decode failures become `Error::Upstream` with the cause.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        request_id: &str,
    ) -> Result<serde_json::Value> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!(request_id, url = url.as_str(), "sending upstream request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(request_id, url = url.as_str(), error = %e, "upstream transport failure");
                Error::transport(format!("Request to {} failed: {}", path, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = body_or_read_error(response.text().await);
            error!(
                request_id,
                http_status = status.as_u16(),
                body = text.as_str(),
                "upstream returned an error status"
            );
            return Err(Error::status(status.as_u16(), text));
        }

        response.json::<serde_json::Value>().await.map_err(|e| {
            error!(request_id, error = %e, "failed to decode upstream response");
            Error::transport(format!("Invalid response body from {}: {}", path, e))
        })
    }
}

/// Error-status body, or a note naming why it could not be read.
fn body_or_read_error<E: fmt::Display>(read: std::result::Result<String, E>) -> String {
    match read {
        Ok(text) => text,
        Err(e) => format!("<body unavailable: {}>", e),
    }
}
