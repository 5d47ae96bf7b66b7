//! Original policy of Workspace APP policy groups
//!
//! `GET /v1/{project_id}/policy-groups/actions/list-original-policy`

use super::write_state;
use crate::config::Config;
use crate::error::{Result, ResultExt};
use crate::path::path_search_json_string;
use crate::schema::{FieldMode, FieldSpec, FieldType, ResourceData, Schema};
use serde_json::Value;

pub const NAME: &str = "workspace_app_original_policy";

const SERVICE: &str = "appstream";
const HTTP_URL: &str = "v1/{project_id}/policy-groups/actions/list-original-policy";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "region",
        FieldType::String,
        FieldMode::OptionalComputed,
        "The region where the original policy is located.",
    ),
    FieldSpec::new(
        "policy",
        FieldType::String,
        FieldMode::Computed,
        "The original policy, in JSON format.",
    ),
];

pub fn schema() -> Schema {
    Schema { fields: FIELDS }
}

pub async fn read(config: &Config, d: &mut ResourceData) -> Result<()> {
    let region = config.get_region(d.get_str("region"));
    let client = config
        .new_service_client(SERVICE, &region)
        .context("error creating Workspace APP client")?;

    let body = client
        .get(HTTP_URL, &[])
        .await
        .context("error querying original policy")?;

    let policy =
        path_search_json_string("policies", &body).context("error parsing original policy")?;
    tracing::debug!("original policy: {} bytes", policy.len());

    write_state(
        d,
        vec![("region", Value::from(region)), ("policy", Value::from(policy))],
    )
}
