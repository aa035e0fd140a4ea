use teloxide::{prelude::ResponseResult, types::User};

use crate::{
    conversation::start_registration,
    handlers::perform,
    membership::is_channel_member,
    menus::{profile::main_menu, prompts, registration::join_channel_menu},
    storages::Applicant,
    target::ReplyTarget,
};

pub async fn command_start(
    target: &ReplyTarget,
    user: Option<&User>,
    payload: &str,
) -> ResponseResult<()> {
    if !payload.is_empty() {
        log::debug!("Chat {} started with payload {:?}", target.chat_id, payload);
    }
    let Some(user) = user else {
        return Ok(());
    };

    let channel = target.settings.channel.as_ref();
    if !is_channel_member(&target.bot, channel, user.id).await {
        log::info!("User {} is not a member of the channel yet", user.id);
        target
            .send_with_keyboard(
                prompts::welcome_join_channel(),
                join_channel_menu(&target.settings.channel_link),
            )
            .await?;
        return Ok(());
    }

    let applicant = match target.applicants().get_applicant(target.chat_id).await {
        Ok(applicant) => applicant,
        Err(e) => return target.report_error(e).await,
    };
    if let Some(name) = applicant.as_ref().and_then(Applicant::registered_name) {
        target
            .send_with_keyboard(prompts::greeting(name), main_menu())
            .await?;
        return Ok(());
    }

    perform(target, start_registration()).await
}
