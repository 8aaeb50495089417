use thiserror::Error;

/// Failure taxonomy for the connector.
///
/// Every operation resolves to exactly one of these before it reaches a
/// caller. `Validation` never touches the network; `Upstream` carries the
/// status (and the upstream business code when one was decoded); `Network`
/// covers connect and timeout failures from the transport.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Caller input malformed or missing
    #[error("{0}")]
    Validation(String),

    /// Non-2xx status, non-zero business code, or undecodable body from upstream.
    /// `code` is the upstream business code when one was decoded; match on it
    /// programmatically rather than on the message text.
    #[error("upstream error (status {status}): {message}")]
    Upstream {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// Connection or timeout failure before a response was received
    #[error("network failure: {0}")]
    Network(String),
}

impl AdapterError {
    pub fn validation(message: impl Into<String>) -> Self {
        AdapterError::Validation(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        AdapterError::Network(message.into())
    }

    /// Stable kind tag used in the error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            AdapterError::Validation(_) => "ValidationError",
            AdapterError::Upstream { .. } => "UpstreamError",
            AdapterError::Network(_) => "NetworkError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_are_stable() {
        assert_eq!(AdapterError::validation("x").kind(), "ValidationError");
        assert_eq!(
            AdapterError::Upstream {
                status: 404,
                code: None,
                message: "not found".to_string(),
            }
            .kind(),
            "UpstreamError"
        );
        assert_eq!(AdapterError::network("refused").kind(), "NetworkError");
    }

    #[test]
    fn upstream_display_includes_status_and_message() {
        let err = AdapterError::Upstream {
            status: 404,
            code: None,
            message: "order not found".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("404"));
        assert!(rendered.contains("order not found"));
    }
}
