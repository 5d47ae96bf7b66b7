//! Available IP count of a Workspace subnet
//!
//! `GET /v2/{project_id}/subnets/{subnet_id}/available-ip`

use super::write_state;
use crate::config::Config;
use crate::error::{Error, Result, ResultExt};
use crate::path::path_search_int;
use crate::schema::{FieldMode, FieldSpec, FieldType, ResourceData, Schema};
use serde_json::Value;

pub const NAME: &str = "workspace_subnet_available_ip";

const SERVICE: &str = "workspace";
const HTTP_URL: &str = "v2/{project_id}/subnets/{subnet_id}/available-ip";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "region",
        FieldType::String,
        FieldMode::OptionalComputed,
        "The region where the subnet is located.",
    ),
    FieldSpec::new(
        "subnet_id",
        FieldType::String,
        FieldMode::Required,
        "The ID of the subnet to be queried.",
    ),
    FieldSpec::new(
        "available_ip",
        FieldType::Int,
        FieldMode::Computed,
        "The number of available IPs in the subnet.",
    ),
];

pub fn schema() -> Schema {
    Schema { fields: FIELDS }
}

pub async fn read(config: &Config, d: &mut ResourceData) -> Result<()> {
    let region = config.get_region(d.get_str("region"));
    let client = config
        .new_service_client(SERVICE, &region)
        .context("error creating Workspace client")?;

    let subnet_id = d
        .get_str("subnet_id")
        .ok_or_else(|| Error::Input("missing required argument \"subnet_id\"".to_string()))?
        .to_string();
    let body = client
        .get(HTTP_URL, &[("subnet_id", subnet_id.as_str())])
        .await
        .context("error querying available IPs of the subnet")?;

    let available_ip =
        path_search_int("available_ip", &body, 0).context("error parsing available_ip")?;
    tracing::debug!("subnet {}: {} available IPs", subnet_id, available_ip);

    write_state(
        d,
        vec![
            ("region", Value::from(region)),
            ("available_ip", Value::from(available_ip)),
        ],
    )
}
