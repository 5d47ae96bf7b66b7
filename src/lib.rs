//! Read-only query data sources for the Workspace service.
//!
//! - `workspace_app_original_policy` - original policy of APP policy groups
//! - `workspace_app_server_group_restrict` - APP server group resource limits
//! - `workspace_subnet_available_ip` - available IP count of a subnet

pub mod cloud;
pub mod config;
pub mod datasource;
pub mod error;
pub mod path;
pub mod schema;

pub use config::Config;
pub use datasource::DataSource;
pub use error::{Error, Result};
pub use schema::ResourceData;
