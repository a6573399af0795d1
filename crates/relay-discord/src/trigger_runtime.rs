//! One-shot trigger handling: filter, dispatch once, render the outcome.

use std::sync::Arc;

use relay_switchbot::{CommandDispatcher, DeviceCommand, DispatchError};
use tracing::{debug, error, info};

use crate::trigger_feedback::{best_effort, TriggerFeedback, TriggerStatus};
use crate::trigger_filter::{TriggerDecision, TriggerEvent, TriggerFilter};

pub const CHANNEL_REJECTION_NOTICE: &str =
    "⛔ I only respond to pings in the designated channel.";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates the result of handling one inbound event.
pub enum TriggerOutcome {
    Ignored,
    ChannelRejected,
    Activated,
    Failed { kind: &'static str, error: String },
}

pub fn render_activation_reply(command: &DeviceCommand) -> String {
    format!(
        "🤖 SwitchBot activated! (command: `{}`)",
        command.name().as_str()
    )
}

pub fn render_failure_reply(error: &DispatchError) -> String {
    format!("⚠️ Failed to activate SwitchBot: {error}")
}

/// Binds the filter to one dispatcher and the statically configured command.
pub struct TriggerRuntime {
    filter: TriggerFilter,
    dispatcher: Arc<dyn CommandDispatcher>,
    command: DeviceCommand,
}

impl TriggerRuntime {
    pub fn new(
        filter: TriggerFilter,
        dispatcher: Arc<dyn CommandDispatcher>,
        command: DeviceCommand,
    ) -> Self {
        Self {
            filter,
            dispatcher,
            command,
        }
    }

    pub fn filter(&self) -> &TriggerFilter {
        &self.filter
    }

    pub fn command(&self) -> &DeviceCommand {
        &self.command
    }

    /// Handles one event. Dispatch failures become [`TriggerOutcome::Failed`]
    /// and never escape; feedback errors are logged and discarded.
    pub async fn handle_event(
        &self,
        event: &TriggerEvent,
        feedback: &dyn TriggerFeedback,
    ) -> TriggerOutcome {
        match self.filter.evaluate(event) {
            TriggerDecision::Ignore => TriggerOutcome::Ignored,
            TriggerDecision::RejectChannel => {
                debug!(
                    author = %event.author_tag,
                    channel_id = %event.channel_id,
                    channel_name = event.channel_name.as_deref().unwrap_or(""),
                    "rejected trigger outside the allowed channel"
                );
                best_effort("reply", feedback.reply(CHANNEL_REJECTION_NOTICE)).await;
                TriggerOutcome::ChannelRejected
            }
            TriggerDecision::Dispatch => self.dispatch_with_feedback(event, feedback).await,
        }
    }

    async fn dispatch_with_feedback(
        &self,
        event: &TriggerEvent,
        feedback: &dyn TriggerFeedback,
    ) -> TriggerOutcome {
        best_effort("react", feedback.react(TriggerStatus::Pending)).await;

        let result = self.dispatcher.dispatch(&self.command).await;

        best_effort("clear_reactions", feedback.clear_reactions()).await;

        match result {
            Ok(_) => {
                best_effort("react", feedback.react(TriggerStatus::Success)).await;
                best_effort(
                    "reply",
                    feedback.reply(&render_activation_reply(&self.command)),
                )
                .await;
                info!(
                    author = %event.author_tag,
                    channel = event.channel_name.as_deref().unwrap_or(event.channel_id.as_str()),
                    command = self.command.name().as_str(),
                    "switchbot activated"
                );
                TriggerOutcome::Activated
            }
            Err(dispatch_error) => {
                best_effort("react", feedback.react(TriggerStatus::Failure)).await;
                best_effort("reply", feedback.reply(&render_failure_reply(&dispatch_error)))
                    .await;
                error!(
                    author = %event.author_tag,
                    kind = dispatch_error.kind(),
                    remote_code = ?dispatch_error.remote_code(),
                    error = %dispatch_error,
                    "switchbot dispatch failed"
                );
                TriggerOutcome::Failed {
                    kind: dispatch_error.kind(),
                    error: dispatch_error.to_string(),
                }
            }
        }
    }
}
