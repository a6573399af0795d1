use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use httpmock::prelude::*;
use relay_discord::{
    TriggerEvent, TriggerFeedback, TriggerFilter, TriggerOutcome, TriggerRuntime, TriggerStatus,
    CHANNEL_REJECTION_NOTICE,
};
use relay_switchbot::{
    CommandName, DeviceCommand, SwitchBotClient, SwitchBotClientConfig, SwitchBotCredentials,
};
use serde_json::json;

const ALLOWED_CHANNEL: &str = "core-members-office-access";

#[derive(Debug, Clone, PartialEq, Eq)]
enum FeedbackStep {
    React(TriggerStatus),
    Clear,
    Reply(String),
}

#[derive(Default)]
struct RecordingFeedback {
    steps: Mutex<Vec<FeedbackStep>>,
}

impl RecordingFeedback {
    fn steps(&self) -> Vec<FeedbackStep> {
        self.steps.lock().expect("steps lock").clone()
    }

    fn push(&self, step: FeedbackStep) {
        self.steps.lock().expect("steps lock").push(step);
    }
}

#[async_trait]
impl TriggerFeedback for RecordingFeedback {
    async fn react(&self, status: TriggerStatus) -> Result<()> {
        self.push(FeedbackStep::React(status));
        Ok(())
    }

    async fn clear_reactions(&self) -> Result<()> {
        self.push(FeedbackStep::Clear);
        Ok(())
    }

    async fn reply(&self, text: &str) -> Result<()> {
        self.push(FeedbackStep::Reply(text.to_string()));
        Ok(())
    }
}

fn relay_runtime(api_base: String, request_timeout_ms: u64) -> TriggerRuntime {
    let client = SwitchBotClient::new(SwitchBotClientConfig {
        api_base,
        credentials: SwitchBotCredentials::new("token-abc", "secret-key").expect("credentials"),
        request_timeout_ms,
    })
    .expect("switchbot client");
    TriggerRuntime::new(
        TriggerFilter::new(ALLOWED_CHANNEL),
        Arc::new(client),
        DeviceCommand::new("D1", CommandName::Press),
    )
}

fn ping_in(channel_name: &str) -> TriggerEvent {
    TriggerEvent {
        author_tag: "alice#0001".to_string(),
        author_is_bot: false,
        mentions_bot: true,
        channel_id: "111".to_string(),
        channel_name: Some(channel_name.to_string()),
    }
}

#[tokio::test]
async fn integration_ping_in_allowed_channel_presses_device_and_reports_success() {
    let server = MockServer::start();
    let command = server.mock(|when, then| {
        when.method(POST)
            .path("/v1.1/devices/D1/commands")
            .header("authorization", "token-abc")
            .header_exists("sign")
            .header_exists("nonce")
            .header_exists("t")
            .json_body(json!({
                "command": "press",
                "parameter": "default",
                "commandType": "command"
            }));
        then.status(200)
            .json_body(json!({"statusCode": 100, "body": {}, "message": "success"}));
    });

    let runtime = relay_runtime(server.base_url(), 5_000);
    let feedback = RecordingFeedback::default();
    let outcome = runtime
        .handle_event(&ping_in(ALLOWED_CHANNEL), &feedback)
        .await;

    assert_eq!(outcome, TriggerOutcome::Activated);
    command.assert_calls(1);
    assert_eq!(
        feedback.steps(),
        vec![
            FeedbackStep::React(TriggerStatus::Pending),
            FeedbackStep::Clear,
            FeedbackStep::React(TriggerStatus::Success),
            FeedbackStep::Reply("🤖 SwitchBot activated! (command: `press`)".to_string()),
        ]
    );
}

#[tokio::test]
async fn integration_rejected_command_surfaces_remote_message_in_reply() {
    let server = MockServer::start();
    let command = server.mock(|when, then| {
        when.method(POST).path("/v1.1/devices/D1/commands");
        then.status(200)
            .json_body(json!({"statusCode": 190, "message": "device offline"}));
    });

    let runtime = relay_runtime(server.base_url(), 5_000);
    let feedback = RecordingFeedback::default();
    let outcome = runtime
        .handle_event(&ping_in(ALLOWED_CHANNEL), &feedback)
        .await;

    command.assert_calls(1);
    let TriggerOutcome::Failed { kind, error } = outcome else {
        panic!("expected failed outcome, got {outcome:?}");
    };
    assert_eq!(kind, "rejected");
    assert!(error.contains("device offline"));

    let steps = feedback.steps();
    assert_eq!(steps[2], FeedbackStep::React(TriggerStatus::Failure));
    let FeedbackStep::Reply(reply) = &steps[3] else {
        panic!("expected failure reply");
    };
    assert!(reply.starts_with("⚠️ Failed to activate SwitchBot:"));
    assert!(reply.contains("190"));
    assert!(reply.contains("device offline"));
}

#[tokio::test]
async fn integration_slow_api_fails_with_transport_timeout_without_retry() {
    let server = MockServer::start();
    let command = server.mock(|when, then| {
        when.method(POST).path("/v1.1/devices/D1/commands");
        then.status(200)
            .delay(std::time::Duration::from_millis(1_500))
            .json_body(json!({"statusCode": 100}));
    });

    let runtime = relay_runtime(server.base_url(), 100);
    let feedback = RecordingFeedback::default();
    let outcome = runtime
        .handle_event(&ping_in(ALLOWED_CHANNEL), &feedback)
        .await;

    let TriggerOutcome::Failed { kind, error } = outcome else {
        panic!("expected failed outcome, got {outcome:?}");
    };
    assert_eq!(kind, "transport");
    assert!(error.contains("timed out"));
    assert!(feedback
        .steps()
        .contains(&FeedbackStep::React(TriggerStatus::Failure)));
    command.assert_calls(1);
}

#[tokio::test]
async fn integration_ping_in_other_channel_never_reaches_switchbot() {
    let server = MockServer::start();
    let command = server.mock(|when, then| {
        when.method(POST).path("/v1.1/devices/D1/commands");
        then.status(200).json_body(json!({"statusCode": 100}));
    });

    let runtime = relay_runtime(server.base_url(), 5_000);
    let feedback = RecordingFeedback::default();
    let outcome = runtime.handle_event(&ping_in("general"), &feedback).await;

    assert_eq!(outcome, TriggerOutcome::ChannelRejected);
    command.assert_calls(0);
    assert_eq!(
        feedback.steps(),
        vec![FeedbackStep::Reply(CHANNEL_REJECTION_NOTICE.to_string())]
    );
}
