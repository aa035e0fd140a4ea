mod command_help;
mod command_pending;
mod command_profile;
mod command_start;

use teloxide::{prelude::ResponseResult, types::User, utils::command::BotCommands};

use crate::target::ReplyTarget;

/// Bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    // deep-link payload after /start is accepted and ignored
    #[command(description = "start registration or open the main menu")]
    Start(String),
    #[command(description = "show your profile")]
    Profile,
    #[command(description = "display this help")]
    Help,
    #[command(description = "list applications waiting for review (reviewer only)")]
    Pending,
}

pub async fn execute_command(
    target: &ReplyTarget,
    user: Option<&User>,
    cmd: Command,
) -> ResponseResult<()> {
    log::info!("Chat {} runs {:?}", target.chat_id, cmd);
    match cmd {
        Command::Start(payload) => command_start::command_start(target, user, &payload).await,
        Command::Profile => command_profile::command_profile(target).await,
        Command::Help => command_help::command_help(target).await,
        Command::Pending => command_pending::command_pending(target).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("/start", "irnog_bot").unwrap(),
            Command::Start(String::new())
        );
        assert_eq!(
            Command::parse("/start ref123", "irnog_bot").unwrap(),
            Command::Start("ref123".to_string())
        );
        assert_eq!(
            Command::parse("/profile@irnog_bot", "irnog_bot").unwrap(),
            Command::Profile
        );
        assert_eq!(
            Command::parse("/pending", "irnog_bot").unwrap(),
            Command::Pending
        );
        assert!(Command::parse("/profile@other_bot", "irnog_bot").is_err());
        assert!(Command::parse("/unknown", "irnog_bot").is_err());
    }

    #[test]
    fn test_descriptions_list_all_commands() {
        let descriptions = Command::descriptions().to_string();
        for name in ["/start", "/profile", "/help", "/pending"] {
            assert!(descriptions.contains(name), "missing {}", name);
        }
    }
}
