use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::DeviceCommand;

/// `statusCode` value the SwitchBot API uses to signal an accepted request.
pub const SWITCHBOT_SUCCESS_STATUS_CODE: i64 = 100;

#[derive(Debug, Clone, PartialEq)]
/// Successful dispatch outcome. Carries the remote body for diagnostics.
pub struct Ack {
    pub message: Option<String>,
    pub body: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `DeviceKind` values.
pub enum DeviceKind {
    Physical,
    InfraredRemote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One entry of the account device listing.
pub struct DeviceDescriptor {
    pub device_name: String,
    pub device_id: String,
    pub device_type: Option<String>,
    pub hub_device_id: Option<String>,
    pub kind: DeviceKind,
}

#[derive(Debug, Error)]
/// Failures that happened before a remote status code could be read.
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(reqwest::Error),
    #[error("connection failed: {0}")]
    Connect(reqwest::Error),
    #[error("http error: {0}")]
    Http(reqwest::Error),
    #[error("malformed response body (http {status}): {detail}")]
    MalformedBody { status: u16, detail: String },
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
    #[error("request could not be built: {0}")]
    RequestBuild(String),
}

impl TransportError {
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else if error.is_connect() {
            Self::Connect(error)
        } else {
            Self::Http(error)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

#[derive(Debug, Error)]
/// Classified failure of one dispatch or listing call.
pub enum DispatchError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    #[error("SwitchBot API error: {} – {message}", render_status_code(.code))]
    Rejected { code: Option<i64>, message: String },
}

impl DispatchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Rejected { .. } => "rejected",
        }
    }

    pub fn remote_code(&self) -> Option<i64> {
        match self {
            Self::Transport(_) => None,
            Self::Rejected { code, .. } => *code,
        }
    }
}

fn render_status_code(code: &Option<i64>) -> String {
    code.map(|code| code.to_string())
        .unwrap_or_else(|| "missing statusCode".to_string())
}

#[derive(Debug, Error)]
/// Enumerates `SwitchBotClient` construction failures.
pub enum ClientBuildError {
    #[error("invalid switchbot api base '{0}'")]
    InvalidApiBase(String),
    #[error("failed to create switchbot http client: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
/// Trait contract for single-attempt command delivery.
///
/// Implementations must build a fresh authentication envelope per call and hold
/// no mutable state, so one instance can serve concurrent triggers.
pub trait CommandDispatcher: Send + Sync {
    async fn dispatch(&self, command: &DeviceCommand) -> Result<Ack, DispatchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_rejected_error_renders_code_and_message() {
        let error = DispatchError::Rejected {
            code: Some(190),
            message: "device offline".to_string(),
        };
        assert_eq!(error.to_string(), "SwitchBot API error: 190 – device offline");
        assert_eq!(error.kind(), "rejected");
        assert_eq!(error.remote_code(), Some(190));
    }

    #[test]
    fn unit_rejected_error_without_code_mentions_missing_status() {
        let error = DispatchError::Rejected {
            code: None,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "SwitchBot API error: missing statusCode – Unauthorized"
        );
        assert_eq!(error.remote_code(), None);
    }

    #[test]
    fn unit_transport_error_has_no_remote_code() {
        let error = DispatchError::from(TransportError::UnexpectedShape("x".to_string()));
        assert_eq!(error.kind(), "transport");
        assert_eq!(error.remote_code(), None);
        assert!(error.to_string().starts_with("transport failure:"));
    }
}
