use botkit::html;
use teloxide::{prelude::ResponseResult, utils::command::BotCommands};

use super::Command;
use crate::target::ReplyTarget;

pub async fn command_help(target: &ReplyTarget) -> ResponseResult<()> {
    target
        .send(html!(
            "🤖 <b>IRNOG membership bot v{}</b>\n\n{}",
            env!("CARGO_PKG_VERSION"),
            Command::descriptions().to_string()
        ))
        .await?;
    Ok(())
}
