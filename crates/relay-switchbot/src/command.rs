//! Device command model and request body serialization.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_COMMAND_PARAMETER: &str = "default";
pub const DEFAULT_COMMAND_TYPE: &str = "command";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Enumerates the closed set of accepted command names.
pub enum CommandName {
    TurnOn,
    TurnOff,
    Toggle,
    #[default]
    Press,
}

impl CommandName {
    pub const ALL: [CommandName; 4] = [Self::TurnOn, Self::TurnOff, Self::Toggle, Self::Press];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TurnOn => "turnOn",
            Self::TurnOff => "turnOff",
            Self::Toggle => "toggle",
            Self::Press => "press",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported switchbot command '{raw}' (expected one of: turnOn, turnOff, toggle, press)")]
/// Returned when a configured command name is outside the accepted set.
pub struct UnsupportedCommandError {
    pub raw: String,
}

impl FromStr for CommandName {
    type Err = UnsupportedCommandError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnsupportedCommandError {
                raw: raw.to_string(),
            })
    }
}

/// A fully resolved command: target device, name, and fixed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCommand {
    device_id: String,
    name: CommandName,
    parameter: String,
    command_type: String,
}

impl DeviceCommand {
    pub fn new(device_id: impl Into<String>, name: CommandName) -> Self {
        Self {
            device_id: device_id.into().trim().to_string(),
            name,
            parameter: DEFAULT_COMMAND_PARAMETER.to_string(),
            command_type: DEFAULT_COMMAND_TYPE.to_string(),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn name(&self) -> CommandName {
        self.name
    }

    pub fn request_body(&self) -> CommandRequestBody<'_> {
        CommandRequestBody {
            command: self.name.as_str(),
            parameter: &self.parameter,
            command_type: &self.command_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Wire body of `POST /v1.1/devices/{deviceId}/commands`.
pub struct CommandRequestBody<'a> {
    pub command: &'a str,
    pub parameter: &'a str,
    pub command_type: &'a str,
}
