use clap::Parser;
use relay_switchbot::{DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SWITCHBOT_API_BASE};

pub const DEFAULT_ALLOWED_CHANNEL: &str = "core-members-office-access";
pub const DEFAULT_HEALTH_PORT: u16 = 3000;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "switchbot-ping-relay",
    about = "Relays Discord pings in one channel to a SwitchBot device command",
    version
)]
/// Public struct `Cli` used by the relay binary.
pub struct Cli {
    #[arg(
        long = "list-devices",
        help = "Print the SwitchBot devices registered to the account and exit"
    )]
    pub list_devices: bool,

    #[arg(
        long = "discord-token",
        env = "DISCORD_TOKEN",
        hide_env_values = true,
        help = "Discord bot token used to connect to the gateway"
    )]
    pub discord_token: Option<String>,

    #[arg(
        long = "allowed-channel",
        env = "ALLOWED_CHANNEL",
        default_value = DEFAULT_ALLOWED_CHANNEL,
        help = "Channel name or channel id where pings are accepted"
    )]
    pub allowed_channel: String,

    #[arg(
        long = "switchbot-token",
        env = "SWITCHBOT_TOKEN",
        hide_env_values = true,
        help = "SwitchBot API v1.1 token"
    )]
    pub switchbot_token: Option<String>,

    #[arg(
        long = "switchbot-secret",
        env = "SWITCHBOT_SECRET",
        hide_env_values = true,
        help = "SwitchBot API v1.1 secret used to sign requests"
    )]
    pub switchbot_secret: Option<String>,

    #[arg(
        long = "switchbot-device-id",
        env = "SWITCHBOT_DEVICE_ID",
        help = "Target device id (see --list-devices)"
    )]
    pub switchbot_device_id: Option<String>,

    #[arg(
        long = "switchbot-command",
        env = "SWITCHBOT_COMMAND",
        default_value = "press",
        help = "Command sent on each ping: press, turnOn, turnOff, or toggle"
    )]
    pub switchbot_command: String,

    #[arg(
        long = "switchbot-api-base",
        env = "SWITCHBOT_API_BASE",
        default_value = DEFAULT_SWITCHBOT_API_BASE,
        help = "Base URL of the SwitchBot API"
    )]
    pub switchbot_api_base: String,

    #[arg(
        long = "request-timeout-ms",
        env = "SWITCHBOT_REQUEST_TIMEOUT_MS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_MS,
        value_parser = parse_positive_u64,
        help = "Timeout for each SwitchBot request in milliseconds"
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long = "port",
        env = "PORT",
        default_value_t = DEFAULT_HEALTH_PORT,
        help = "Port of the liveness endpoint"
    )]
    pub port: u16,

    #[arg(
        long = "health-bind-host",
        env = "HEALTH_BIND_HOST",
        default_value = "0.0.0.0",
        help = "Interface address of the liveness endpoint"
    )]
    pub health_bind_host: String,
}
