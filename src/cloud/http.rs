//! HTTP utilities for Workspace REST API calls

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Header carrying a pre-issued IAM token
const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Decode a response body into a generic JSON value
/// An empty body decodes to `null`.
pub fn flatten_response(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body)
        .map_err(|e| Error::Decode(format!("failed to parse response JSON: {}", e)))
}

/// HTTP client wrapper for Workspace API calls
#[derive(Clone)]
pub struct WorkspaceHttpClient {
    client: Client,
    auth_token: Option<String>,
}

impl WorkspaceHttpClient {
    /// Create a new HTTP client
    pub fn new(auth_token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("hwws/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::ClientBuild(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, auth_token })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.auth_token {
            let value = HeaderValue::from_str(token)
                .map_err(|_| Error::request("auth token contains invalid header characters"))?;
            headers.insert(AUTH_TOKEN_HEADER, value);
        }

        Ok(headers)
    }

    /// Make a GET request and decode the JSON response
    pub async fn get(&self, url: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| Error::request(format!("failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Request {
                message: format!("failed to read response body: {}", e),
                status: Some(status.as_u16()),
            })?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(Error::Request {
                message: format!("API request failed: {}", status),
                status: Some(status.as_u16()),
            });
        }

        flatten_response(&body)
    }
}
