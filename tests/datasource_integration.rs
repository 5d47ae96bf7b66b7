//! Integration tests for the Workspace data sources using wiremock
//!
//! Each data source is read against a mocked service endpoint, checking the
//! request it sends, the state it writes and how failures are reported.

use hwws::datasource::DataSource;
use hwws::error::Error;
use hwws::schema::ResourceData;
use hwws::Config;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REGION: &str = "cn-north-4";
const PROJECT: &str = "proj-123";

/// Config routing both services to the mock server
fn mock_config(server: &MockServer) -> Config {
    let mut config = Config {
        region: REGION.to_string(),
        project_id: Some(PROJECT.to_string()),
        auth_token: Some("test-token".to_string()),
        ..Default::default()
    };
    config
        .endpoints
        .insert("workspace".to_string(), server.uri());
    config
        .endpoints
        .insert("appstream".to_string(), server.uri());
    config
}

fn inputs(pairs: &[(&str, &str)]) -> BTreeMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect()
}

fn assert_valid_id(state: &Value) {
    let id = state["id"].as_str().expect("id should be set");
    assert!(!id.is_empty());
    assert!(uuid::Uuid::parse_str(id).is_ok(), "not a UUID: {}", id);
}

mod original_policy_tests {
    use super::*;

    const PATH: &str = "/v1/proj-123/policy-groups/actions/list-original-policy";

    /// The policy is the `policies` sub-document serialized as JSON
    #[tokio::test]
    async fn test_policy_reproduces_subdocument() {
        let server = MockServer::start().await;
        let policies = json!({
            "peripherals": {"usb_port_redirection": {"options": {"usb_enable": true}}},
            "clipboard": {"options": {"clipboard_file_from_client": false}}
        });

        Mock::given(method("GET"))
            .and(path(PATH))
            .and(header("content-type", "application/json"))
            .and(header("x-auth-token", "test-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "policies": policies.clone() })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let data = DataSource::OriginalPolicy
            .read_with_inputs(&mock_config(&server), BTreeMap::new())
            .await
            .expect("read should succeed");

        let state = data.to_state();
        assert_valid_id(&state);
        assert_eq!(state["region"], REGION);

        let policy: Value =
            serde_json::from_str(state["policy"].as_str().unwrap()).expect("policy is JSON");
        assert_eq!(policy, policies);
    }

    /// A missing `policies` field yields an empty policy string
    #[tokio::test]
    async fn test_missing_policies_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let data = DataSource::OriginalPolicy
            .read_with_inputs(&mock_config(&server), BTreeMap::new())
            .await
            .unwrap();

        assert_eq!(data.get_str("policy"), None);
        assert_eq!(data.to_state()["policy"], "");
    }

    /// A non-JSON body is a decode error and writes nothing
    #[tokio::test]
    async fn test_invalid_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let config = mock_config(&server);
        let mut d = ResourceData::new(DataSource::OriginalPolicy.schema(), BTreeMap::new())
            .unwrap();
        let err = DataSource::OriginalPolicy
            .read(&config, &mut d)
            .await
            .unwrap_err();

        assert!(matches!(err.root(), Error::Decode(_)));
        assert!(err.to_string().starts_with("error querying original policy"));
        assert!(!d.is_written());
    }
}

mod server_group_restrict_tests {
    use super::*;

    const PATH: &str = "/v1/proj-123/app-server-groups/resources/restrict";

    /// Both limits are copied as integers
    #[tokio::test]
    async fn test_limits_copied() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "max_session": 50,
                "max_group_count": 200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = DataSource::ServerGroupRestrict
            .read_with_inputs(&mock_config(&server), BTreeMap::new())
            .await
            .unwrap();

        let state = data.to_state();
        assert_valid_id(&state);
        assert_eq!(state["max_session"], json!(50));
        assert_eq!(state["max_group_count"], json!(200));
        assert!(state["max_session"].is_i64());
    }

    /// The query helper returns the raw decoded body
    #[tokio::test]
    async fn test_query_restrict_returns_raw_body() {
        let server = MockServer::start().await;
        let body = json!({"max_session": 1.0, "max_group_count": 2, "extra": "kept"});

        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let client = mock_config(&server)
            .new_service_client("appstream", REGION)
            .unwrap();
        let raw = hwws::datasource::server_group_restrict::query_restrict(&client)
            .await
            .unwrap();
        assert_eq!(raw, body);
    }

    /// A query-level region selects that region's project
    #[tokio::test]
    async fn test_query_region_overrides_provider_region() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/proj-ap/app-server-groups/resources/restrict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "max_session": 3,
                "max_group_count": 4
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = mock_config(&server);
        config
            .projects
            .insert("ap-southeast-1".to_string(), "proj-ap".to_string());

        let data = DataSource::ServerGroupRestrict
            .read_with_inputs(&config, inputs(&[("region", "ap-southeast-1")]))
            .await
            .unwrap();
        assert_eq!(data.get_str("region"), Some("ap-southeast-1"));
        assert_eq!(data.get("max_group_count"), Some(&json!(4)));
    }

    /// A non-success status is a request error carrying the status
    #[tokio::test]
    async fn test_403_is_request_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error_code": "WKS.0001",
                "error_msg": "Permission denied"
            })))
            .mount(&server)
            .await;

        let config = mock_config(&server);
        let mut d =
            ResourceData::new(DataSource::ServerGroupRestrict.schema(), BTreeMap::new()).unwrap();
        let err = DataSource::ServerGroupRestrict
            .read(&config, &mut d)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert_eq!(
            hwws::error::format_error(&err),
            "Permission denied. Check your IAM permissions."
        );
        assert!(!d.is_written());
    }
}

mod available_ip_tests {
    use super::*;

    /// Float counts are exposed as integers; the path carries the subnet id
    #[tokio::test]
    async fn test_float_count_becomes_integer() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/proj-123/subnets/subnet-abc-001/available-ip"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"available_ip": 42.0})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let data = DataSource::AvailableIp
            .read_with_inputs(&mock_config(&server), inputs(&[("subnet_id", "subnet-abc-001")]))
            .await
            .unwrap();

        let state = data.to_state();
        assert_valid_id(&state);
        assert_eq!(state["available_ip"], json!(42));
        assert_eq!(state["subnet_id"], "subnet-abc-001");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let request_path = requests[0].url.path();
        assert!(request_path.contains("subnet-abc-001"));
        assert!(!request_path.contains('{') && !request_path.contains('}'));
    }

    /// An absent count is exposed as 0
    #[tokio::test]
    async fn test_missing_count_is_zero() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/proj-123/subnets/subnet-1/available-ip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let data = DataSource::AvailableIp
            .read_with_inputs(&mock_config(&server), inputs(&[("subnet_id", "subnet-1")]))
            .await
            .unwrap();
        assert_eq!(data.get("available_ip"), Some(&json!(0)));
    }

    /// An empty body behaves like an empty document
    #[tokio::test]
    async fn test_empty_body_is_zero() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/proj-123/subnets/subnet-1/available-ip"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let data = DataSource::AvailableIp
            .read_with_inputs(&mock_config(&server), inputs(&[("subnet_id", "subnet-1")]))
            .await
            .unwrap();
        assert_eq!(data.get("available_ip"), Some(&json!(0)));
    }

    /// A missing subnet id is rejected before any request is sent
    #[tokio::test]
    async fn test_missing_subnet_id_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = DataSource::AvailableIp
            .read_with_inputs(&mock_config(&server), BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    /// A dot-segment subnet id cannot redirect the request to another path
    #[tokio::test]
    async fn test_dot_segment_subnet_id_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"available_ip": 7})))
            .expect(0)
            .mount(&server)
            .await;

        for subnet_id in ["..", "."] {
            let err = DataSource::AvailableIp
                .read_with_inputs(&mock_config(&server), inputs(&[("subnet_id", subnet_id)]))
                .await
                .unwrap_err();
            assert!(matches!(err.root(), Error::Input(_)), "{:?}: {:?}", subnet_id, err);
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    /// A count beyond the integer range is a decode error
    #[tokio::test]
    async fn test_out_of_range_count_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/proj-123/subnets/subnet-1/available-ip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"available_ip": 1e30})))
            .mount(&server)
            .await;

        let err = DataSource::AvailableIp
            .read_with_inputs(&mock_config(&server), inputs(&[("subnet_id", "subnet-1")]))
            .await
            .unwrap_err();
        assert!(matches!(err.root(), Error::Decode(_)));
    }

    /// A wrongly typed count is a decode error
    #[tokio::test]
    async fn test_string_count_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/proj-123/subnets/subnet-1/available-ip"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"available_ip": "many"})),
            )
            .mount(&server)
            .await;

        let err = DataSource::AvailableIp
            .read_with_inputs(&mock_config(&server), inputs(&[("subnet_id", "subnet-1")]))
            .await
            .unwrap_err();
        assert!(matches!(err.root(), Error::Decode(_)));
    }
}

mod failure_tests {
    use super::*;

    /// Config whose endpoints refuse connections
    fn unreachable_config() -> Config {
        let mut config = Config {
            region: REGION.to_string(),
            project_id: Some(PROJECT.to_string()),
            ..Default::default()
        };
        for service in ["workspace", "appstream"] {
            config
                .endpoints
                .insert(service.to_string(), "http://127.0.0.1:1".to_string());
        }
        config
    }

    /// Transport errors are reported and nothing is written, for every data source
    #[tokio::test]
    async fn test_transport_error_writes_nothing() {
        let config = unreachable_config();

        for ds in DataSource::ALL {
            let mut d = ResourceData::new(ds.schema(), inputs(&[])).unwrap_or_else(|_| {
                ResourceData::new(ds.schema(), inputs(&[("subnet_id", "subnet-1")])).unwrap()
            });

            let err = ds.read(&config, &mut d).await.unwrap_err();
            let Error::Request { message, status } = err.root() else {
                panic!("{}: expected request error, got {:?}", ds.name(), err);
            };
            assert!(message.contains("failed to send request"));
            assert_eq!(*status, None);
            assert!(!d.is_written(), "{} wrote state after failure", ds.name());
            assert!(d.id().is_none());
        }
    }

    /// An unconfigured region fails at client construction
    #[tokio::test]
    async fn test_missing_region_is_client_error() {
        let config = Config::default();

        let err = DataSource::OriginalPolicy
            .read_with_inputs(&config, BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err.root(), Error::ClientBuild(_)));
        assert!(err
            .to_string()
            .starts_with("error creating Workspace APP client"));
    }

    /// Every successful read gets its own identifier
    #[tokio::test]
    async fn test_each_read_gets_fresh_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/proj-123/app-server-groups/resources/restrict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "max_session": 1,
                "max_group_count": 1
            })))
            .mount(&server)
            .await;

        let config = mock_config(&server);
        let first = DataSource::ServerGroupRestrict
            .read_with_inputs(&config, BTreeMap::new())
            .await
            .unwrap();
        let second = DataSource::ServerGroupRestrict
            .read_with_inputs(&config, BTreeMap::new())
            .await
            .unwrap();

        assert_ne!(first.id(), second.id());
    }
}
