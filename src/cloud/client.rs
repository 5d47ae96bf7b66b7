//! Service Client
//!
//! A resolved client bound to one service endpoint, project and region,
//! combining path templating and HTTP functionality.

use super::http::WorkspaceHttpClient;
use crate::error::{Error, Result};
use crate::path::substitute_path;
use serde_json::Value;
use url::Url;

/// Client for one service in one region
#[derive(Clone)]
pub struct ServiceClient {
    http: WorkspaceHttpClient,
    endpoint: Url,
    project_id: String,
    region: String,
}

// Manual impl so the wrapped HTTP client (and its auth token) is never printed.
impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("project_id", &self.project_id)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    /// Create a client for an endpoint
    /// The endpoint must be an absolute URL; a trailing slash is added if missing.
    pub fn new(
        http: WorkspaceHttpClient,
        endpoint: &str,
        project_id: &str,
        region: &str,
    ) -> Result<Self> {
        let mut endpoint = endpoint.to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| Error::ClientBuild(format!("invalid endpoint {:?}: {}", endpoint, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(Error::ClientBuild(format!(
                "invalid endpoint {:?}: not a base URL",
                endpoint.as_str()
            )));
        }

        Ok(Self {
            http,
            endpoint,
            project_id: project_id.to_string(),
            region: region.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Build the full URL for a path template such as `v1/{project_id}/...`
    /// `{project_id}` is always filled from the client.
    pub fn resource_url(&self, template: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut all = Vec::with_capacity(params.len() + 1);
        all.push(("project_id", self.project_id.as_str()));
        all.extend_from_slice(params);

        let path = substitute_path(template.trim_start_matches('/'), &all)?;
        self.endpoint
            .join(&path)
            .map_err(|e| Error::request(format!("invalid request path {:?}: {}", path, e)))
    }

    /// Make a GET request against a path template
    pub async fn get(&self, template: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = self.resource_url(template, params)?;
        tracing::debug!("region={}, project={}", self.region, self.project_id);
        self.http.get(url.as_str()).await
    }
}
