//! Feedback surface a trigger writes to: status reactions and replies.

use std::future::Future;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates the three visual phases of a trigger.
pub enum TriggerStatus {
    Pending,
    Success,
    Failure,
}

impl TriggerStatus {
    pub fn emoji(self) -> char {
        match self {
            Self::Pending => '⏳',
            Self::Success => '✅',
            Self::Failure => '❌',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

#[async_trait]
/// Trait contract for rendering feedback onto the message that triggered a dispatch.
pub trait TriggerFeedback: Send + Sync {
    async fn react(&self, status: TriggerStatus) -> Result<()>;

    async fn clear_reactions(&self) -> Result<()>;

    async fn reply(&self, text: &str) -> Result<()>;
}

/// Awaits a feedback operation and discards its failure after logging it.
///
/// Feedback never decides the trigger outcome and must not abort the handler.
pub async fn best_effort<F>(operation: &str, future: F)
where
    F: Future<Output = Result<()>>,
{
    if let Err(error) = future.await {
        warn!(operation, error = %error, "trigger feedback failed");
    }
}
