//! Configuration Management
//!
//! Provider-level settings shared by every data source: default region,
//! project IDs, cloud domain, endpoint overrides and the auth token.
//! Sources in order of precedence: CLI flags > environment > config file > defaults.

use crate::cloud::catalog;
use crate::cloud::client::ServiceClient;
use crate::cloud::http::WorkspaceHttpClient;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default cloud domain used to build service endpoints
pub const DEFAULT_CLOUD: &str = "myhuaweicloud.com";

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Provider-level region, used when a query does not name one
    #[serde(default)]
    pub region: String,
    /// Project ID for the provider-level region
    #[serde(default)]
    pub project_id: Option<String>,
    /// Project IDs for other regions
    #[serde(default)]
    pub projects: HashMap<String, String>,
    /// Cloud domain, e.g. `myhuaweicloud.com`
    #[serde(default)]
    pub cloud: Option<String>,
    /// Per-service endpoint overrides, e.g. `{"workspace": "https://..."}`
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
    /// Pre-issued token sent as `X-Auth-Token`
    #[serde(default, skip_serializing)]
    pub auth_token: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hwws").join("config.json"))
    }

    /// Load configuration from the default location, then apply the environment
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ClientBuild(format!("failed to read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            Error::ClientBuild(format!("failed to parse config {}: {}", path.display(), e))
        })
    }

    /// Apply `HW_*` environment overrides through a lookup function
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(region) = var("HW_REGION_NAME") {
            self.region = region;
        }
        if let Some(project_id) = var("HW_PROJECT_ID") {
            self.project_id = Some(project_id);
        }
        if let Some(token) = var("HW_AUTH_TOKEN") {
            self.auth_token = Some(token);
        }
        if let Some(cloud) = var("HW_CLOUD") {
            self.cloud = Some(cloud);
        }
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            std::fs::write(path, content)
        };
        write().map_err(|e| {
            Error::ClientBuild(format!("failed to write config {}: {}", path.display(), e))
        })
    }

    /// Effective cloud domain
    pub fn effective_cloud(&self) -> &str {
        self.cloud.as_deref().unwrap_or(DEFAULT_CLOUD)
    }

    /// Region for a query: the query's own region if set, else the provider region
    pub fn get_region(&self, requested: Option<&str>) -> String {
        match requested {
            Some(region) if !region.is_empty() => region.to_string(),
            _ => self.region.clone(),
        }
    }

    /// Project ID for a region
    pub fn project_id_for(&self, region: &str) -> Option<&str> {
        if let Some(id) = self.projects.get(region) {
            return Some(id.as_str());
        }
        if region == self.region {
            return self.project_id.as_deref();
        }
        None
    }

    /// Build a client bound to a service and region
    pub fn new_service_client(&self, service: &str, region: &str) -> Result<ServiceClient> {
        let Some(entry) = catalog::lookup(service) else {
            let known: Vec<_> = catalog::services().collect();
            return Err(Error::ClientBuild(format!(
                "service type {} is invalid or not supported (known: {})",
                service,
                known.join(", ")
            )));
        };

        if region.is_empty() {
            return Err(Error::ClientBuild(
                "region is not configured; set it on the query or the provider".to_string(),
            ));
        }

        let project_id = self.project_id_for(region).ok_or_else(|| {
            Error::ClientBuild(format!("no project ID configured for region {}", region))
        })?;

        let endpoint = match self.endpoints.get(service) {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://{}.{}.{}/", entry.name, region, self.effective_cloud()),
        };

        let http = WorkspaceHttpClient::new(self.auth_token.clone())?;
        ServiceClient::new(http, &endpoint, project_id, region)
    }
}
