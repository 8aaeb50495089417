use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::AdapterError;
use crate::{leads, order, tag, user};

/// HTTP verb an operation maps to. GET operations carry query parameters,
/// POST operations carry a JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Validated outbound payload produced by an operation's builder.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Query string pairs for GET operations
    Query(Vec<(&'static str, String)>),
    /// JSON body for POST operations
    Body(Value),
}

/// One entry in the operation table: everything the surfaces need to list,
/// validate and forward a call, minus the transport itself.
pub struct Operation {
    pub name: &'static str,
    pub description: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub input_schema: Value,
    /// Validates raw JSON arguments and produces the outbound payload.
    /// Runs before any network activity; failures are `Validation` errors.
    pub build: fn(Value) -> Result<Payload, AdapterError>,
}

lazy_static! {
    /// The full operation table, assembled from the per-domain modules.
    pub static ref REGISTRY: Vec<Operation> = {
        let mut ops = Vec::new();
        ops.extend(user::operations());
        ops.extend(tag::operations());
        ops.extend(order::operations());
        ops.extend(leads::operations());
        ops
    };
}

/// Look an operation up by tool name.
pub fn find(name: &str) -> Option<&'static Operation> {
    REGISTRY.iter().find(|op| op.name == name)
}

/// Look an operation up by its upstream path. The REST surface reuses the
/// upstream paths verbatim, so this doubles as the inbound route lookup.
pub fn find_by_path(path: &str) -> Option<&'static Operation> {
    REGISTRY.iter().find(|op| op.path == path)
}

/// Deserialize raw tool arguments into a typed input, mapping serde failures
/// (missing fields, wrong types) to `Validation`.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, AdapterError> {
    serde_json::from_value(args)
        .map_err(|e| AdapterError::Validation(format!("invalid arguments: {e}")))
}

/// JSON Schema for a typed input, for tool listings.
pub(crate) fn schema_of<T: schemars::JsonSchema>() -> Value {
    let schema = schemars::gen::SchemaGenerator::default().into_root_schema_for::<T>();
    serde_json::to_value(schema).expect("schema serializes")
}

/// Serialize a validated input back into the outbound JSON body. Fields that
/// were absent are omitted, never sent as null.
pub(crate) fn body_of<T: Serialize>(input: &T) -> Payload {
    Payload::Body(serde_json::to_value(input).expect("payload serializes"))
}

/// Required string fields must also be non-empty.
pub(crate) fn require_non_empty(value: &str, field: &str) -> Result<(), AdapterError> {
    if value.trim().is_empty() {
        return Err(AdapterError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}
