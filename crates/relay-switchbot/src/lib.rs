//! SwitchBot API v1.1 client used by the ping relay.
//!
//! Every request carries a freshly generated authentication envelope (timestamp,
//! nonce, HMAC-SHA256 signature). Command dispatch is single-attempt and every
//! outcome is classified as an [`Ack`], a remote rejection, or a transport
//! failure.
mod client;
mod command;
mod credentials;
mod types;

pub use client::{
    SwitchBotClient, SwitchBotClientConfig, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SWITCHBOT_API_BASE,
};
pub use command::{
    CommandName, CommandRequestBody, DeviceCommand, UnsupportedCommandError,
    DEFAULT_COMMAND_PARAMETER, DEFAULT_COMMAND_TYPE,
};
pub use credentials::{
    sign_payload, AuthEnvelope, CredentialsError, SigningError, SwitchBotCredentials,
};
pub use types::{
    Ack, ClientBuildError, CommandDispatcher, DeviceDescriptor, DeviceKind, DispatchError,
    TransportError, SWITCHBOT_SUCCESS_STATUS_CODE,
};
