//! Discord front end for the ping relay.
//!
//! Turns mention events into [`TriggerEvent`] values, applies the channel
//! filter, and drives exactly one dispatch per accepted trigger while
//! rendering pending/success/failure feedback on the originating message.

pub mod discord_adapter;
pub mod trigger_feedback;
pub mod trigger_filter;
pub mod trigger_runtime;

pub use discord_adapter::{run_discord_client, DiscordTriggerHandler};
pub use trigger_feedback::{best_effort, TriggerFeedback, TriggerStatus};
pub use trigger_filter::{TriggerDecision, TriggerEvent, TriggerFilter};
pub use trigger_runtime::{
    render_activation_reply, render_failure_reply, TriggerOutcome, TriggerRuntime,
    CHANNEL_REJECTION_NOTICE,
};
