//! Resource limits for Workspace APP server groups
//!
//! `GET /v1/{project_id}/app-server-groups/resources/restrict`

use super::write_state;
use crate::cloud::client::ServiceClient;
use crate::config::Config;
use crate::error::{Result, ResultExt};
use crate::path::path_search_int;
use crate::schema::{FieldMode, FieldSpec, FieldType, ResourceData, Schema};
use serde_json::Value;

pub const NAME: &str = "workspace_app_server_group_restrict";

const SERVICE: &str = "appstream";
const HTTP_URL: &str = "v1/{project_id}/app-server-groups/resources/restrict";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "region",
        FieldType::String,
        FieldMode::OptionalComputed,
        "The region where the server group restrictions are located.",
    ),
    FieldSpec::new(
        "max_session",
        FieldType::Int,
        FieldMode::Computed,
        "The maximum number of sessions a single server can serve.",
    ),
    FieldSpec::new(
        "max_group_count",
        FieldType::Int,
        FieldMode::Computed,
        "The maximum number of server groups that can be created.",
    ),
];

pub fn schema() -> Schema {
    Schema { fields: FIELDS }
}

/// Fetch the raw restriction document
pub async fn query_restrict(client: &ServiceClient) -> Result<Value> {
    client.get(HTTP_URL, &[]).await
}

pub async fn read(config: &Config, d: &mut ResourceData) -> Result<()> {
    let region = config.get_region(d.get_str("region"));
    let client = config
        .new_service_client(SERVICE, &region)
        .context("error creating Workspace APP client")?;

    let body = query_restrict(&client)
        .await
        .context("error querying server group restrictions")?;

    let max_session =
        path_search_int("max_session", &body, 0).context("error parsing max_session")?;
    let max_group_count =
        path_search_int("max_group_count", &body, 0).context("error parsing max_group_count")?;

    write_state(
        d,
        vec![
            ("region", Value::from(region)),
            ("max_session", Value::from(max_session)),
            ("max_group_count", Value::from(max_group_count)),
        ],
    )
}
