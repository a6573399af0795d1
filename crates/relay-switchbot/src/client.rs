//! SwitchBot HTTP client: signed command dispatch and device enumeration.

use std::time::Duration;

use async_trait::async_trait;
use relay_core::truncate_for_error;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{RequestBuilder, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    Ack, AuthEnvelope, ClientBuildError, CommandDispatcher, DeviceCommand, DeviceDescriptor,
    DeviceKind, DispatchError, SwitchBotCredentials, TransportError,
    SWITCHBOT_SUCCESS_STATUS_CODE,
};

pub const DEFAULT_SWITCHBOT_API_BASE: &str = "https://api.switch-bot.com";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

const SWITCHBOT_API_VERSION_SEGMENT: &str = "v1.1";
const ERROR_BODY_SNIPPET_CHARS: usize = 320;

#[derive(Debug, Clone)]
/// Public struct `SwitchBotClientConfig` used to build a [`SwitchBotClient`].
pub struct SwitchBotClientConfig {
    pub api_base: String,
    pub credentials: SwitchBotCredentials,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone)]
/// Stateless SwitchBot API client. Safe to share across concurrent triggers.
pub struct SwitchBotClient {
    http: reqwest::Client,
    api_base: Url,
    credentials: SwitchBotCredentials,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDevice {
    device_id: String,
    #[serde(default)]
    device_name: String,
    #[serde(default)]
    device_type: Option<String>,
    #[serde(default)]
    hub_device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInfraredRemote {
    device_id: String,
    #[serde(default)]
    device_name: String,
    #[serde(default)]
    remote_type: Option<String>,
    #[serde(default)]
    hub_device_id: Option<String>,
}

impl SwitchBotClient {
    pub fn new(config: SwitchBotClientConfig) -> Result<Self, ClientBuildError> {
        let raw_base = config.api_base.trim();
        let api_base = Url::parse(raw_base)
            .map_err(|_| ClientBuildError::InvalidApiBase(raw_base.to_string()))?;
        if api_base.cannot_be_a_base() {
            return Err(ClientBuildError::InvalidApiBase(raw_base.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("switchbot-ping-relay"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()?;

        Ok(Self {
            http,
            api_base,
            credentials: config.credentials,
        })
    }

    /// Sends one signed command. No retry; the caller owns retry policy.
    pub async fn dispatch_command(&self, command: &DeviceCommand) -> Result<Ack, DispatchError> {
        let url = self.endpoint(&["devices", command.device_id(), "commands"])?;
        let body = serde_json::to_vec(&command.request_body()).map_err(|error| {
            TransportError::RequestBuild(format!("failed to encode command body: {error}"))
        })?;
        debug!(
            device_id = command.device_id(),
            command = command.name().as_str(),
            "dispatching switchbot command"
        );
        let request = self.http.post(url).headers(self.signed_headers()?).body(body);
        self.execute(request).await
    }

    /// Lists physical devices and infrared remotes registered to the account.
    pub async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, DispatchError> {
        let url = self.endpoint(&["devices"])?;
        let request = self.http.get(url).headers(self.signed_headers()?);
        let ack = self.execute(request).await?;
        Ok(parse_device_listing(&ack.body)?)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.api_base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                TransportError::RequestBuild("api base cannot carry a path".to_string())
            })?;
            path.pop_if_empty()
                .push(SWITCHBOT_API_VERSION_SEGMENT)
                .extend(segments);
        }
        Ok(url)
    }

    fn signed_headers(&self) -> Result<HeaderMap, TransportError> {
        let envelope = AuthEnvelope::generate(&self.credentials)
            .map_err(|error| TransportError::RequestBuild(error.to_string()))?;
        envelope_headers(&self.credentials, &envelope)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Ack, DispatchError> {
        let response = request.send().await.map_err(TransportError::from_reqwest)?;
        let status = response.status().as_u16();
        let raw = response
            .bytes()
            .await
            .map_err(TransportError::from_reqwest)?;
        let payload = serde_json::from_slice::<Value>(&raw).map_err(|error| {
            TransportError::MalformedBody {
                status,
                detail: format!(
                    "{error}; body={}",
                    truncate_for_error(&String::from_utf8_lossy(&raw), ERROR_BODY_SNIPPET_CHARS)
                ),
            }
        })?;
        classify_response(payload)
    }
}

#[async_trait]
impl CommandDispatcher for SwitchBotClient {
    async fn dispatch(&self, command: &DeviceCommand) -> Result<Ack, DispatchError> {
        self.dispatch_command(command).await
    }
}

fn envelope_headers(
    credentials: &SwitchBotCredentials,
    envelope: &AuthEnvelope,
) -> Result<HeaderMap, TransportError> {
    let header_value = |name: &str, value: &str| {
        HeaderValue::from_str(value).map_err(|error| {
            TransportError::RequestBuild(format!("invalid {name} header: {error}"))
        })
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        header_value("authorization", credentials.token())?,
    );
    headers.insert("sign", header_value("sign", &envelope.signature)?);
    headers.insert("nonce", header_value("nonce", &envelope.nonce)?);
    headers.insert("t", header_value("t", &envelope.timestamp_ms)?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn classify_response(payload: Value) -> Result<Ack, DispatchError> {
    let status_code = payload.get("statusCode").and_then(Value::as_i64);
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);

    match status_code {
        Some(SWITCHBOT_SUCCESS_STATUS_CODE) => Ok(Ack {
            message,
            body: payload,
        }),
        code => Err(DispatchError::Rejected {
            code,
            message: message.unwrap_or_else(|| "no message in response".to_string()),
        }),
    }
}

fn parse_device_listing(payload: &Value) -> Result<Vec<DeviceDescriptor>, TransportError> {
    let listing = payload
        .get("body")
        .ok_or_else(|| TransportError::UnexpectedShape("missing body".to_string()))?;
    let devices = listing
        .get("deviceList")
        .and_then(Value::as_array)
        .ok_or_else(|| TransportError::UnexpectedShape("missing body.deviceList".to_string()))?;

    let mut descriptors = Vec::with_capacity(devices.len());
    for device in devices {
        let raw = RawDevice::deserialize(device).map_err(|error| {
            TransportError::UnexpectedShape(format!("invalid deviceList entry: {error}"))
        })?;
        descriptors.push(DeviceDescriptor {
            device_name: raw.device_name,
            device_id: raw.device_id,
            device_type: raw.device_type,
            hub_device_id: raw.hub_device_id,
            kind: DeviceKind::Physical,
        });
    }

    if let Some(remotes) = listing.get("infraredRemoteList").and_then(Value::as_array) {
        for remote in remotes {
            let raw = RawInfraredRemote::deserialize(remote).map_err(|error| {
                TransportError::UnexpectedShape(format!(
                    "invalid infraredRemoteList entry: {error}"
                ))
            })?;
            descriptors.push(DeviceDescriptor {
                device_name: raw.device_name,
                device_id: raw.device_id,
                device_type: raw.remote_type,
                hub_device_id: raw.hub_device_id,
                kind: DeviceKind::InfraredRemote,
            });
        }
    }

    Ok(descriptors)
}
