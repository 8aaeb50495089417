/// The single HTTP adapter every operation goes through: one connection pool,
/// one signed round trip per call, one attempt, and uniform normalization of
/// the upstream `{code, msg, data}` envelope.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use meridian_core::registry::{self, Method, Operation, Payload};
use meridian_core::{AdapterError, Envelope};

use crate::config::MeridianConfig;
use crate::signature::{sign, unix_timestamp};

/// Longest upstream body fragment carried into an error message.
const BODY_PREVIEW_LIMIT: usize = 200;

/// Wire shape of every upstream response. `code` 0 means success; anything
/// else is an upstream business failure even on HTTP 200.
#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Client for the upstream Meridian API.
#[derive(Debug, Clone)]
pub struct MeridianClient {
    http: reqwest::Client,
    api_host: String,
    user_id: String,
    api_secret: String,
}

impl MeridianClient {
    /// Build the client and its connection pool. Called once at startup; the
    /// client is cheap to clone and safe for concurrent in-flight calls.
    pub fn new(config: &MeridianConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            api_host: config.api_host.clone(),
            user_id: config.user_id.clone(),
            api_secret: config.api_secret.clone(),
        })
    }

    /// Run one operation end to end: validate the arguments, perform the
    /// signed round trip, unwrap the upstream data field.
    pub async fn execute(&self, op: &Operation, args: Value) -> Result<Value, AdapterError> {
        let payload = (op.build)(args)?;
        tracing::debug!(operation = op.name, "arguments validated");
        self.send(op.method, op.path, payload).await
    }

    /// Operation lookup plus execution, normalized into the envelope. Unknown
    /// names fail validation without touching the network.
    pub async fn call(&self, name: &str, args: Value) -> Envelope {
        let Some(op) = registry::find(name) else {
            return Envelope::from_result(Err(AdapterError::Validation(format!(
                "unknown operation: {name}"
            ))));
        };
        Envelope::from_result(self.execute(op, args).await)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<Value, AdapterError> {
        let url = format!("{}{}", self.api_host, path);
        let headers = sign(&self.user_id, &self.api_secret, unix_timestamp());

        let mut request = match method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        request = request
            .header("X-User-ID", &headers.user_id)
            .header("X-Timestamp", &headers.timestamp)
            .header("X-Signature", &headers.signature)
            .header("Content-Type", "application/json");
        request = match payload {
            Payload::Query(pairs) => request.query(&pairs),
            Payload::Body(body) => request.json(&body),
        };

        tracing::info!("→ {} {}", method.as_str(), url);
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!("upstream returned status {} for {}", status, path);
            return Err(AdapterError::Upstream {
                status: status.as_u16(),
                code: None,
                message: body_preview(&body),
            });
        }

        let decoded: UpstreamResponse =
            serde_json::from_str(&body).map_err(|e| AdapterError::Upstream {
                status: status.as_u16(),
                code: None,
                message: format!("invalid JSON from upstream: {e}"),
            })?;

        if decoded.code != 0 {
            tracing::warn!(
                "upstream rejected {} with code {}: {}",
                path,
                decoded.code,
                decoded.msg
            );
            return Err(AdapterError::Upstream {
                status: status.as_u16(),
                code: Some(decoded.code),
                message: decoded.msg,
            });
        }

        tracing::info!("✓ {} {} succeeded", method.as_str(), path);
        Ok(decoded.data.unwrap_or(Value::Null))
    }
}

fn transport_error(err: reqwest::Error) -> AdapterError {
    if err.is_timeout() {
        AdapterError::network(format!("request timed out: {err}"))
    } else {
        AdapterError::network(err.to_string())
    }
}

fn body_preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    let mut preview: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().count() > BODY_PREVIEW_LIMIT {
        preview.push('…');
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_client(server: &MockServer) -> MeridianClient {
        let config = MeridianConfig::new(
            server.base_url(),
            "acct-42".to_string(),
            "beefcafe".to_string(),
            5,
            false,
        )
        .unwrap();
        MeridianClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn create_user_with_mobile_returns_user_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v5/entity/user/create")
                .header_exists("X-User-ID")
                .header_exists("X-Timestamp")
                .header_exists("X-Signature")
                .json_body(json!({"mobile": "15550100"}));
            then.status(200).json_body(json!({
                "code": 0,
                "msg": "ok",
                "data": {"user_id": "u-123", "is_user_exists": false}
            }));
        });

        let client = test_client(&server);
        let envelope = client
            .call("create_user", json!({"mobile": "15550100"}))
            .await;

        mock.assert();
        assert!(envelope.is_success());
        assert_eq!(envelope.data.unwrap()["user_id"], "u-123");
    }

    #[tokio::test]
    async fn validation_failure_never_reaches_the_network() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/v5/entity/user/create");
            then.status(200).json_body(json!({"code": 0, "msg": "ok"}));
        });

        let client = test_client(&server);
        let envelope = client.call("create_user", json!({})).await;

        assert!(!envelope.is_success());
        assert_eq!(envelope.error.unwrap().kind, "ValidationError");
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn unknown_operation_fails_validation() {
        let server = MockServer::start();
        let client = test_client(&server);

        let envelope = client.call("drop_all_users", json!({})).await;

        assert!(!envelope.is_success());
        let error = envelope.error.unwrap();
        assert_eq!(error.kind, "ValidationError");
        assert!(error.message.contains("drop_all_users"));
    }

    #[tokio::test]
    async fn fetch_order_maps_upstream_404_to_error_envelope() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v5/entity/order/fetch")
                .query_param("order_id", "ORD-1");
            then.status(404).body("order not found");
        });

        let client = test_client(&server);
        let envelope = client.call("fetch_order", json!({"order_id": "ORD-1"})).await;

        mock.assert();
        assert!(!envelope.is_success());
        let error = envelope.error.unwrap();
        assert_eq!(error.kind, "UpstreamError");
        assert!(error.message.contains("404"));
    }

    #[tokio::test]
    async fn nonzero_business_code_is_an_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v5/entity/profile/fetch");
            then.status(200)
                .json_body(json!({"code": 1002, "msg": "user not found"}));
        });

        let client = test_client(&server);
        let result = client
            .execute(
                registry::find("fetch_user_profile").unwrap(),
                json!({"user_id": "u-404"}),
            )
            .await;

        match result.unwrap_err() {
            AdapterError::Upstream { status, code, message } => {
                assert_eq!(status, 200);
                assert_eq!(code, Some(1002));
                assert_eq!(message, "user not found");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_an_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v5/entity/tags/group/list");
            then.status(200).body("<html>gateway</html>");
        });

        let client = test_client(&server);
        let envelope = client.call("list_tag_groups", json!({})).await;

        assert!(!envelope.is_success());
        assert_eq!(envelope.error.unwrap().kind, "UpstreamError");
    }

    #[tokio::test]
    async fn connection_failure_is_a_network_error() {
        // Port 1 is reserved and nothing listens on it.
        let config = MeridianConfig::new(
            "http://127.0.0.1:1".to_string(),
            "acct-42".to_string(),
            "beefcafe".to_string(),
            5,
            false,
        )
        .unwrap();
        let client = MeridianClient::new(&config).unwrap();

        let envelope = client
            .call("fetch_user_profile", json!({"user_id": "u-1"}))
            .await;

        assert!(!envelope.is_success());
        assert_eq!(envelope.error.unwrap().kind, "NetworkError");
    }

    #[tokio::test]
    async fn list_orders_forwards_filters_as_query_params() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v5/entity/order/list")
                .query_param("user_id", "u-1")
                .query_param("status", "paid")
                .query_param("limit", "10");
            then.status(200).json_body(json!({
                "code": 0,
                "msg": "ok",
                "data": {"total": 0, "rows": []}
            }));
        });

        let client = test_client(&server);
        let envelope = client
            .call(
                "list_orders",
                json!({"user_id": "u-1", "status": "paid", "limit": 10}),
            )
            .await;

        mock.assert();
        assert!(envelope.is_success());
    }

    #[tokio::test]
    async fn import_leads_preserves_per_record_outcomes_in_order() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/v5/entity/leads/import");
            then.status(200).json_body(json!({
                "code": 0,
                "msg": "ok",
                "data": {
                    "results": [
                        {"lead_id": "l-1", "status": "imported"},
                        {"lead_id": "l-2", "status": "imported"},
                        {"status": "failed", "reason": "duplicate mobile"}
                    ]
                }
            }));
        });

        let client = test_client(&server);
        let envelope = client
            .call(
                "import_leads",
                json!({"leads_data": [
                    {"mobile": "1001"},
                    {"mobile": "1002"},
                    {"mobile": "1001"}
                ]}),
            )
            .await;

        mock.assert();
        assert!(envelope.is_success());
        let results = envelope.data.unwrap()["results"].as_array().unwrap().clone();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["status"], "imported");
        assert_eq!(results[1]["status"], "imported");
        assert_eq!(results[2]["status"], "failed");
    }

    #[tokio::test]
    async fn success_without_data_yields_null() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/v5/entity/tags/group/activate");
            then.status(200).json_body(json!({"code": 0, "msg": "ok"}));
        });

        let client = test_client(&server);
        let envelope = client
            .call("activate_tag_group", json!({"group_id": "g-1"}))
            .await;

        assert!(envelope.is_success());
        assert_eq!(envelope.data.unwrap(), Value::Null);
    }
}
