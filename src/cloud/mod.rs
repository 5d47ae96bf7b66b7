//! Cloud API interaction module
//!
//! Everything needed to turn "service + region" into an HTTP call against the
//! right endpoint.
//!
//! # Module Structure
//!
//! - [`catalog`] - Known services and how their endpoints are named
//! - [`client`] - Service client bound to an endpoint, project and region
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use hwws::config::Config;
//!
//! async fn example(config: &Config) -> hwws::error::Result<()> {
//!     let client = config.new_service_client("workspace", "cn-north-4")?;
//!     let body = client
//!         .get("v2/{project_id}/subnets/{subnet_id}/available-ip", &[("subnet_id", "abc")])
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod client;
pub mod http;
