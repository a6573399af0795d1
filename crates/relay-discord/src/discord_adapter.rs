//! Serenity gateway adapter: message events in, reactions and replies out.

use std::sync::{Arc, OnceLock};

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serenity::all::{Channel, Client, Context, EventHandler, GatewayIntents, Message, Ready, UserId};
use tracing::{debug, info, warn};

use crate::trigger_feedback::{TriggerFeedback, TriggerStatus};
use crate::trigger_filter::TriggerEvent;
use crate::trigger_runtime::TriggerRuntime;

pub fn relay_gateway_intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

/// Connects to the Discord gateway and serves triggers until the client stops.
pub async fn run_discord_client(token: &str, runtime: Arc<TriggerRuntime>) -> Result<()> {
    let mut client = Client::builder(token, relay_gateway_intents())
        .event_handler(DiscordTriggerHandler::new(runtime))
        .await
        .context("failed to create discord client")?;
    client
        .start()
        .await
        .context("discord gateway client exited unexpectedly")
}

/// Serenity event handler feeding message events into a [`TriggerRuntime`].
pub struct DiscordTriggerHandler {
    runtime: Arc<TriggerRuntime>,
    bot_user_id: OnceLock<UserId>,
}

impl DiscordTriggerHandler {
    pub fn new(runtime: Arc<TriggerRuntime>) -> Self {
        Self {
            runtime,
            bot_user_id: OnceLock::new(),
        }
    }

    async fn resolve_bot_user_id(&self, ctx: &Context) -> Option<UserId> {
        if let Some(user_id) = self.bot_user_id.get() {
            return Some(*user_id);
        }
        match ctx.http.get_current_user().await {
            Ok(user) => {
                let _ = self.bot_user_id.set(user.id);
                Some(user.id)
            }
            Err(error) => {
                warn!(error = %error, "failed to resolve current discord user");
                None
            }
        }
    }

    async fn trigger_event(&self, ctx: &Context, message: &Message) -> TriggerEvent {
        let author_is_bot = message.author.bot;
        let mentions_bot = if author_is_bot {
            false
        } else {
            match self.resolve_bot_user_id(ctx).await {
                Some(bot_user_id) => message.mentions_user_id(bot_user_id),
                None => false,
            }
        };
        // Channel lookup costs an API call, so it only runs for mentions.
        let channel_name = if mentions_bot {
            resolve_channel_name(ctx, message).await
        } else {
            None
        };

        TriggerEvent {
            author_tag: message.author.tag(),
            author_is_bot,
            mentions_bot,
            channel_id: message.channel_id.to_string(),
            channel_name,
        }
    }
}

async fn resolve_channel_name(ctx: &Context, message: &Message) -> Option<String> {
    match message.channel_id.to_channel(ctx).await {
        Ok(Channel::Guild(channel)) => Some(channel.name),
        Ok(_) => None,
        Err(error) => {
            debug!(
                channel_id = %message.channel_id,
                error = %error,
                "failed to resolve channel name; matching by id only"
            );
            None
        }
    }
}

#[async_trait]
impl EventHandler for DiscordTriggerHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        let _ = self.bot_user_id.set(ready.user.id);
        info!(
            bot = %ready.user.tag(),
            channel = self.runtime.filter().allowed_channel(),
            "discord relay ready; listening for pings"
        );
    }

    async fn message(&self, ctx: Context, message: Message) {
        let event = self.trigger_event(&ctx, &message).await;
        let feedback = SerenityMessageFeedback {
            ctx: &ctx,
            message: &message,
        };
        let outcome = self.runtime.handle_event(&event, &feedback).await;
        debug!(message_id = %message.id, outcome = ?outcome, "handled discord message");
    }
}

struct SerenityMessageFeedback<'a> {
    ctx: &'a Context,
    message: &'a Message,
}

#[async_trait]
impl<'a> TriggerFeedback for SerenityMessageFeedback<'a> {
    async fn react(&self, status: TriggerStatus) -> Result<()> {
        self.message
            .react(self.ctx, status.emoji())
            .await
            .with_context(|| format!("failed to add {} reaction", status.as_str()))?;
        Ok(())
    }

    async fn clear_reactions(&self) -> Result<()> {
        self.message
            .delete_reactions(self.ctx)
            .await
            .context("failed to clear message reactions")
    }

    async fn reply(&self, text: &str) -> Result<()> {
        self.message
            .reply(self.ctx, text)
            .await
            .context("failed to send discord reply")?;
        Ok(())
    }
}
