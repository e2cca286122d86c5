//! Telegram adapter (teloxide).
//!
//! Implements the `cpb-core` ChannelPort over the Bot API `getChatMember`
//! call and hosts the polling loop + update handlers.

use std::time::Duration;

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatMemberKind, Recipient},
};

pub mod handlers;
pub mod router;

use cpb_core::{
    domain::{ChannelRef, UserId},
    gate::{ChannelError, ChannelPort, MembershipStatus},
};

/// Member-status lookups against Telegram, bounded by `timeout` so a hung
/// Bot API call cannot stall the dispatcher.
#[derive(Clone)]
pub struct TelegramChannelGate {
    bot: Bot,
    timeout: Duration,
}

impl TelegramChannelGate {
    pub fn new(bot: Bot, timeout: Duration) -> Self {
        Self { bot, timeout }
    }
}

#[async_trait]
impl ChannelPort for TelegramChannelGate {
    async fn member_status(
        &self,
        channel: &ChannelRef,
        user: UserId,
    ) -> Result<MembershipStatus, ChannelError> {
        let recipient = channel_recipient(channel);
        let user_id = teloxide::types::UserId(user.0 as u64);

        let call = self.bot.get_chat_member(recipient, user_id);
        let member = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(member)) => member,
            Ok(Err(teloxide::RequestError::Api(teloxide::ApiError::ChatNotFound))) => {
                return Err(ChannelError::ChannelNotFound(channel.0.clone()));
            }
            Ok(Err(e)) => return Err(ChannelError::Other(format!("telegram error: {e}"))),
            Err(_) => {
                return Err(ChannelError::Other(format!(
                    "getChatMember timed out after {:?}",
                    self.timeout
                )));
            }
        };

        Ok(map_member_kind(&member.kind))
    }
}

fn map_member_kind(kind: &ChatMemberKind) -> MembershipStatus {
    match kind {
        ChatMemberKind::Owner(_) => MembershipStatus::Owner,
        ChatMemberKind::Administrator(_) => MembershipStatus::Administrator,
        ChatMemberKind::Member => MembershipStatus::Member,
        ChatMemberKind::Restricted(_) => MembershipStatus::Restricted,
        ChatMemberKind::Left => MembershipStatus::Left,
        ChatMemberKind::Banned(_) => MembershipStatus::Banned,
    }
}

/// A channel reference is either a numeric chat id or an `@username`.
fn channel_recipient(channel: &ChannelRef) -> Recipient {
    if let Ok(id) = channel.0.parse::<i64>() {
        return Recipient::Id(teloxide::types::ChatId(id));
    }
    if channel.0.starts_with('@') {
        Recipient::ChannelUsername(channel.0.clone())
    } else {
        Recipient::ChannelUsername(format!("@{}", channel.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_channel_refs_become_chat_ids() {
        let r = channel_recipient(&ChannelRef("-1001234567890".to_string()));
        assert_eq!(r, Recipient::Id(teloxide::types::ChatId(-1001234567890)));
    }

    #[test]
    fn usernames_keep_or_gain_the_at_prefix() {
        assert_eq!(
            channel_recipient(&ChannelRef("@pulse".to_string())),
            Recipient::ChannelUsername("@pulse".to_string())
        );
        assert_eq!(
            channel_recipient(&ChannelRef("pulse".to_string())),
            Recipient::ChannelUsername("@pulse".to_string())
        );
    }
}
