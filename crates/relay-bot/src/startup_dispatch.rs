//! Startup mode dispatch: one-shot device listing or the long-running relay.

use std::sync::Arc;

use anyhow::{Context, Result};
use relay_cli::{DeviceListingConfig, ListenConfig};
use relay_discord::{run_discord_client, TriggerFilter, TriggerRuntime};
use relay_switchbot::{DeviceDescriptor, DeviceKind, SwitchBotClient};
use tracing::info;

use crate::health_server::spawn_health_server;

pub(crate) async fn run_device_listing(config: DeviceListingConfig) -> Result<()> {
    let client =
        SwitchBotClient::new(config.switchbot).context("failed to create switchbot client")?;
    let devices = client
        .list_devices()
        .await
        .context("failed to list switchbot devices")?;
    print!("{}", render_device_listing(&devices));
    Ok(())
}

pub(crate) fn render_device_listing(devices: &[DeviceDescriptor]) -> String {
    let mut lines = vec![
        String::new(),
        "📋 Your SwitchBot devices:".to_string(),
        String::new(),
    ];
    if devices.is_empty() {
        lines.push("  (no devices registered to this account)".to_string());
    }
    for device in devices {
        let device_type = device.device_type.as_deref().unwrap_or("unknown type");
        let suffix = match device.kind {
            DeviceKind::Physical => "",
            DeviceKind::InfraredRemote => " [infrared remote]",
        };
        lines.push(format!(
            "  {} — ID: {} ({}){}",
            device.device_name, device.device_id, device_type, suffix
        ));
    }
    lines.push(String::new());
    format!("{}\n", lines.join("\n"))
}

pub(crate) async fn run_listen_mode(config: ListenConfig) -> Result<()> {
    let ListenConfig {
        discord_token,
        allowed_channel,
        switchbot,
        command,
        health_bind,
    } = config;

    let client = SwitchBotClient::new(switchbot).context("failed to create switchbot client")?;
    info!(
        channel = %allowed_channel,
        device_id = command.device_id(),
        command = command.name().as_str(),
        "configured switchbot relay"
    );
    let runtime = Arc::new(TriggerRuntime::new(
        TriggerFilter::new(allowed_channel),
        Arc::new(client),
        command,
    ));

    let health = spawn_health_server(health_bind).await?;
    info!(addr = %health.local_addr, "liveness endpoint listening");

    let result = run_discord_client(&discord_token, runtime).await;
    health.shutdown();
    result
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use relay_switchbot::{SwitchBotClientConfig, SwitchBotCredentials};
    use serde_json::json;

    use super::*;

    fn device(name: &str, id: &str, device_type: Option<&str>, kind: DeviceKind) -> DeviceDescriptor {
        DeviceDescriptor {
            device_name: name.to_string(),
            device_id: id.to_string(),
            device_type: device_type.map(str::to_string),
            hub_device_id: None,
            kind,
        }
    }

    #[test]
    fn functional_render_device_listing_prints_one_line_per_device() {
        let rendered = render_device_listing(&[
            device("Office Door", "D1", Some("Bot"), DeviceKind::Physical),
            device("TV", "IR1", Some("TV"), DeviceKind::InfraredRemote),
            device("Mystery", "D9", None, DeviceKind::Physical),
        ]);
        assert_eq!(
            rendered,
            "\n📋 Your SwitchBot devices:\n\n  Office Door — ID: D1 (Bot)\n  TV — ID: IR1 (TV) [infrared remote]\n  Mystery — ID: D9 (unknown type)\n\n"
        );
    }

    #[test]
    fn regression_render_device_listing_reports_empty_account() {
        let rendered = render_device_listing(&[]);
        assert!(rendered.contains("(no devices registered to this account)"));
    }

    fn listing_config(api_base: String) -> DeviceListingConfig {
        DeviceListingConfig {
            switchbot: SwitchBotClientConfig {
                api_base,
                credentials: SwitchBotCredentials::new("token-abc", "secret-key")
                    .expect("credentials"),
                request_timeout_ms: 5_000,
            },
        }
    }

    #[tokio::test]
    async fn integration_run_device_listing_succeeds_against_api() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1.1/devices");
            then.status(200).json_body(json!({
                "statusCode": 100,
                "body": {"deviceList": [{"deviceId": "D1", "deviceName": "Office Door", "deviceType": "Bot"}]},
                "message": "success"
            }));
        });

        run_device_listing(listing_config(server.base_url()))
            .await
            .expect("listing should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn regression_run_device_listing_fails_on_rejection() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1.1/devices");
            then.status(200)
                .json_body(json!({"statusCode": 190, "message": "wrong secret"}));
        });

        let error = run_device_listing(listing_config(server.base_url()))
            .await
            .expect_err("listing should fail");
        let rendered = format!("{error:#}");
        assert!(rendered.contains("failed to list switchbot devices"));
        assert!(rendered.contains("190 – wrong secret"));
    }
}
