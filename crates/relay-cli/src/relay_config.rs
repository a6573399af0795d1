//! Startup validation turning parsed flags into an immutable [`RelayConfig`].

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use relay_core::non_empty_trimmed;
use relay_switchbot::{
    CommandName, CredentialsError, DeviceCommand, SwitchBotClientConfig, SwitchBotCredentials,
    UnsupportedCommandError,
};
use thiserror::Error;

use crate::cli_args::{Cli, DEFAULT_ALLOWED_CHANNEL};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates startup configuration failures.
pub enum ConfigError {
    #[error("missing required setting --{flag} (env {env})")]
    Missing {
        flag: &'static str,
        env: &'static str,
    },
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error(transparent)]
    Command(#[from] UnsupportedCommandError),
    #[error("invalid --health-bind-host '{0}'")]
    InvalidHealthBindHost(String),
}

#[derive(Debug, Clone)]
/// Startup mode selected by `--list-devices`.
pub enum RelayConfig {
    ListDevices(DeviceListingConfig),
    Listen(ListenConfig),
}

#[derive(Debug, Clone)]
pub struct DeviceListingConfig {
    pub switchbot: SwitchBotClientConfig,
}

#[derive(Clone)]
pub struct ListenConfig {
    pub discord_token: String,
    pub allowed_channel: String,
    pub switchbot: SwitchBotClientConfig,
    pub command: DeviceCommand,
    pub health_bind: SocketAddr,
}

impl fmt::Debug for ListenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenConfig")
            .field("discord_token", &"<redacted>")
            .field("allowed_channel", &self.allowed_channel)
            .field("switchbot", &self.switchbot)
            .field("command", &self.command)
            .field("health_bind", &self.health_bind)
            .finish()
    }
}

impl RelayConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let switchbot = switchbot_client_config(cli)?;
        if cli.list_devices {
            return Ok(Self::ListDevices(DeviceListingConfig { switchbot }));
        }

        let discord_token = required(
            cli.discord_token.as_deref(),
            "discord-token",
            "DISCORD_TOKEN",
        )?;
        let device_id = required(
            cli.switchbot_device_id.as_deref(),
            "switchbot-device-id",
            "SWITCHBOT_DEVICE_ID",
        )?;
        let command_name = cli.switchbot_command.parse::<CommandName>()?;
        let allowed_channel = non_empty_trimmed(Some(cli.allowed_channel.as_str()))
            .unwrap_or_else(|| DEFAULT_ALLOWED_CHANNEL.to_string());
        let health_host = cli
            .health_bind_host
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHealthBindHost(cli.health_bind_host.clone()))?;

        Ok(Self::Listen(ListenConfig {
            discord_token,
            allowed_channel,
            switchbot,
            command: DeviceCommand::new(device_id, command_name),
            health_bind: SocketAddr::new(health_host, cli.port),
        }))
    }
}

fn switchbot_client_config(cli: &Cli) -> Result<SwitchBotClientConfig, ConfigError> {
    let token = required(
        cli.switchbot_token.as_deref(),
        "switchbot-token",
        "SWITCHBOT_TOKEN",
    )?;
    let secret = required(
        cli.switchbot_secret.as_deref(),
        "switchbot-secret",
        "SWITCHBOT_SECRET",
    )?;
    Ok(SwitchBotClientConfig {
        api_base: cli.switchbot_api_base.trim().to_string(),
        credentials: SwitchBotCredentials::new(token, secret)?,
        request_timeout_ms: cli.request_timeout_ms,
    })
}

fn required(
    value: Option<&str>,
    flag: &'static str,
    env: &'static str,
) -> Result<String, ConfigError> {
    non_empty_trimmed(value).ok_or(ConfigError::Missing { flag, env })
}
