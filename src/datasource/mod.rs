//! Workspace data sources
//!
//! Each data source is a read-only query: resolve a service client, issue one
//! GET, pick fields out of the response and write them into a [`ResourceData`]
//! under a freshly generated identifier.
//!
//! # Architecture
//!
//! - [`original_policy`] - Original policy of APP policy groups
//! - [`server_group_restrict`] - Resource limits for APP server groups
//! - [`available_ip`] - Available IP count of a subnet
//!
//! # Example
//!
//! ```ignore
//! use hwws::config::Config;
//! use hwws::datasource::DataSource;
//!
//! async fn available_ips(config: &Config) -> hwws::error::Result<()> {
//!     let source = DataSource::from_name("workspace_subnet_available_ip").unwrap();
//!     let inputs = [("subnet_id".to_string(), "abc".into())].into_iter().collect();
//!     let data = source.read_with_inputs(config, inputs).await?;
//!     println!("{}", data.to_state());
//!     Ok(())
//! }
//! ```

pub mod available_ip;
pub mod original_policy;
pub mod server_group_restrict;

use crate::config::Config;
use crate::error::{MultiError, Result};
use crate::schema::{ResourceData, Schema};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Every data source this crate provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    OriginalPolicy,
    ServerGroupRestrict,
    AvailableIp,
}

impl DataSource {
    pub const ALL: [DataSource; 3] = [
        DataSource::OriginalPolicy,
        DataSource::ServerGroupRestrict,
        DataSource::AvailableIp,
    ];

    /// Look up a data source by its registered name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ds| ds.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            DataSource::OriginalPolicy => original_policy::NAME,
            DataSource::ServerGroupRestrict => server_group_restrict::NAME,
            DataSource::AvailableIp => available_ip::NAME,
        }
    }

    pub fn schema(self) -> Schema {
        match self {
            DataSource::OriginalPolicy => original_policy::schema(),
            DataSource::ServerGroupRestrict => server_group_restrict::schema(),
            DataSource::AvailableIp => available_ip::schema(),
        }
    }

    /// Run the read against already validated resource data
    pub async fn read(self, config: &Config, d: &mut ResourceData) -> Result<()> {
        tracing::info!("read: data_source={}", self.name());

        let result = match self {
            DataSource::OriginalPolicy => original_policy::read(config, d).await,
            DataSource::ServerGroupRestrict => server_group_restrict::read(config, d).await,
            DataSource::AvailableIp => available_ip::read(config, d).await,
        };

        if let Err(e) = &result {
            tracing::warn!("read failed: data_source={}, error={}", self.name(), e);
        }
        result
    }

    /// Validate raw inputs against the schema, then read
    pub async fn read_with_inputs(
        self,
        config: &Config,
        inputs: BTreeMap<String, Value>,
    ) -> Result<ResourceData> {
        let mut d = ResourceData::new(self.schema(), inputs)?;
        self.read(config, &mut d).await?;
        Ok(d)
    }
}

/// Random identifier for a stateless query result
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Assign a fresh identifier, then write every field
/// All writes are attempted; failures are reported together.
pub(crate) fn write_state(d: &mut ResourceData, fields: Vec<(&str, Value)>) -> Result<()> {
    d.set_id(generate_id());

    let merr = fields
        .into_iter()
        .map(|(name, value)| d.set(name, value))
        .collect::<MultiError>();

    merr.into_result()?;
    Ok(())
}
