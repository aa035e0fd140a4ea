use teloxide::{prelude::*, types::Recipient};

/// Whether the user may register: always true when no channel is configured.
/// A failed lookup counts as "not a member".
pub async fn is_channel_member(bot: &Bot, channel: Option<&Recipient>, user_id: UserId) -> bool {
    let Some(channel) = channel else {
        return true;
    };
    match bot.get_chat_member(channel.clone(), user_id).await {
        Ok(member) => {
            member.kind.is_owner() || member.kind.is_administrator() || member.kind.is_member()
        }
        Err(e) => {
            log::warn!(
                "Failed to check membership of {} in {:?}: {}",
                user_id,
                channel,
                e
            );
            false
        }
    }
}
