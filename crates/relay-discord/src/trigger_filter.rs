//! Channel and mention predicate applied to inbound chat messages.

/// Platform-neutral view of one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    pub author_tag: String,
    pub author_is_bot: bool,
    pub mentions_bot: bool,
    pub channel_id: String,
    pub channel_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `TriggerDecision` values.
pub enum TriggerDecision {
    /// Not addressed to the relay; no reply and no dispatch.
    Ignore,
    /// Addressed to the relay from a channel outside the allow-list.
    RejectChannel,
    /// Qualifying trigger; dispatch exactly once.
    Dispatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerFilter {
    allowed_channel: String,
}

impl TriggerFilter {
    /// `allowed_channel` matches either a channel display name or a channel id.
    pub fn new(allowed_channel: impl Into<String>) -> Self {
        Self {
            allowed_channel: allowed_channel.into(),
        }
    }

    pub fn allowed_channel(&self) -> &str {
        &self.allowed_channel
    }

    pub fn evaluate(&self, event: &TriggerEvent) -> TriggerDecision {
        if event.author_is_bot || !event.mentions_bot {
            return TriggerDecision::Ignore;
        }
        if self.channel_is_allowed(event) {
            TriggerDecision::Dispatch
        } else {
            TriggerDecision::RejectChannel
        }
    }

    fn channel_is_allowed(&self, event: &TriggerEvent) -> bool {
        // Exact, case-sensitive comparison for both name and id.
        let by_name = event.channel_name.as_deref() == Some(self.allowed_channel.as_str());
        by_name || event.channel_id == self.allowed_channel
    }
}
