use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdapterError;

/// Outcome marker of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Error half of the envelope: a stable kind tag plus a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub kind: String,
    pub message: String,
}

/// The one shape every caller receives, success or failure.
///
/// Serializes to `{"status":"success","data":...}` or
/// `{"status":"error","error":{"kind":...,"message":...}}` and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EnvelopeError>,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self {
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(err: &AdapterError) -> Self {
        Self {
            status: Status::Error,
            data: None,
            error: Some(EnvelopeError {
                kind: err.kind().to_string(),
                message: err.to_string(),
            }),
        }
    }

    /// The single translation point from handler outcomes to the caller-visible
    /// shape. Raw transport errors never cross this boundary.
    pub fn from_result(result: Result<Value, AdapterError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(&err),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

impl From<Result<Value, AdapterError>> for Envelope {
    fn from(result: Result<Value, AdapterError>) -> Self {
        Envelope::from_result(result)
    }
}
