/// Meridian MCP Server Library
///
/// Exposes the Meridian connector operations over HTTP:
/// - GET  /health, GET /        — liveness and service info, unauthenticated
/// - GET  /tools                — operation descriptors with JSON Schemas
/// - POST /tools/{name}         — tool invocation with JSON arguments
/// - REST aliases on the upstream's own /api/v5/entity/... paths
///
/// Every response body is the connector envelope; all routes except health
/// and service info require the configured bearer key.

use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use meridian_client::MeridianClient;
use meridian_core::registry::{self, Method, REGISTRY};
use meridian_core::{AdapterError, Envelope};

/// Shared state for the HTTP surface.
pub struct AppState {
    pub client: MeridianClient,
    pub api_key: String,
}

/// Operation descriptors for both surfaces (HTTP tool listing and the
/// JSON-RPC `tools/list` result share this shape).
pub fn tool_listing() -> Value {
    json!({
        "tools": REGISTRY
            .iter()
            .map(|op| {
                json!({
                    "name": op.name,
                    "description": op.description,
                    "method": op.method.as_str(),
                    "path": op.path,
                    "inputSchema": op.input_schema,
                })
            })
            .collect::<Vec<_>>()
    })
}

/// Build the router. REST aliases are registered straight off the operation
/// table so both surfaces always expose the identical operation set.
pub fn app(state: Arc<AppState>) -> Router {
    let mut protected = Router::new()
        .route("/tools", get(list_tools))
        .route("/tools/:name", post(call_tool));

    for op in REGISTRY.iter() {
        protected = match op.method {
            Method::Get => protected.route(op.path, get(rest_get)),
            Method::Post => protected.route(op.path, post(rest_post)),
        };
    }

    let protected =
        protected.layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "name": "Meridian MCP Connector",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

async fn list_tools() -> Json<Value> {
    Json(tool_listing())
}

/// Bearer-key check for everything except health and service info. Rejections
/// keep the envelope shape so callers only ever parse one format.
async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token == state.api_key)
        .unwrap_or(false);

    if !authorized {
        let envelope =
            Envelope::from_result(Err(AdapterError::validation("invalid or missing API key")));
        return (StatusCode::UNAUTHORIZED, Json(envelope)).into_response();
    }

    next.run(request).await
}

async fn call_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> Response {
    let args = body.map(|Json(v)| v).unwrap_or_else(|| json!({}));
    let call_id = Uuid::new_v4();
    tracing::info!(%call_id, tool = %name, "tool call received");

    let envelope = state.client.call(&name, args).await;
    respond(call_id, envelope)
}

async fn rest_post(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    body: Option<Json<Value>>,
) -> Response {
    let args = body.map(|Json(v)| v).unwrap_or_else(|| json!({}));
    dispatch_path(&state, uri.path(), args).await
}

async fn rest_get(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    dispatch_path(&state, uri.path(), query_args(params)).await
}

async fn dispatch_path(state: &AppState, path: &str, args: Value) -> Response {
    let call_id = Uuid::new_v4();
    tracing::info!(%call_id, %path, "rest call received");

    let envelope = match registry::find_by_path(path) {
        Some(op) => Envelope::from_result(state.client.execute(op, args).await),
        // Routes come from the table, so this only fires if they drift apart.
        None => Envelope::from_result(Err(AdapterError::Validation(format!(
            "no operation registered for {path}"
        )))),
    };
    respond(call_id, envelope)
}

fn respond(call_id: Uuid, envelope: Envelope) -> Response {
    let status = envelope_status(&envelope);
    if envelope.is_success() {
        tracing::info!(%call_id, "call succeeded");
    } else if let Some(error) = &envelope.error {
        tracing::warn!(%call_id, kind = %error.kind, "call failed: {}", error.message);
    }
    (status, Json(envelope)).into_response()
}

/// HTTP status mirrors the envelope: caller mistakes are 400, everything that
/// went wrong past the connector is 502.
fn envelope_status(envelope: &Envelope) -> StatusCode {
    match &envelope.error {
        None => StatusCode::OK,
        Some(error) => match error.kind.as_str() {
            "ValidationError" => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}

/// Query strings arrive untyped; limit and offset are the only numeric fields
/// in the table, so those two are coerced and everything else stays a string.
fn query_args(params: HashMap<String, String>) -> Value {
    let mut map = serde_json::Map::new();
    for (key, value) in params {
        let coerced = if key == "limit" || key == "offset" {
            value
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::String(value))
        } else {
            Value::String(value)
        };
        map.insert(key, coerced);
    }
    Value::Object(map)
}
