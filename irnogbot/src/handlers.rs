use std::sync::Arc;

use teloxide::{prelude::*, types::CallbackQuery, utils::command::BotCommands};

use crate::{
    callback::{ApplicantAction, CallbackAction},
    commands::{Command, execute_command},
    config::Settings,
    conversation::{Reply, Step, on_callback, on_text},
    menus::{
        profile::{edit_menu, show_profile},
        prompts,
        registration::{company_menu, verification_menu},
    },
    review::{decide, finalize_registration, resubmit},
    storages::StorageTrait,
    target::ReplyTarget,
};

/// Registration happens in private chats, the reviewer may sit in a group
fn accepts_chat(is_private: bool, chat_id: ChatId, admin_id: ChatId) -> bool {
    is_private || chat_id == admin_id
}

/// What becomes of the message carrying a pressed applicant button
#[derive(Debug, PartialEq, Eq)]
enum MenuOutcome {
    Keep,
    /// A company was picked, the menu has served its purpose
    Delete,
    /// The button belongs to an earlier step
    Stale,
}

fn menu_outcome(action: ApplicantAction, step: &Step) -> MenuOutcome {
    let form_button = matches!(
        action,
        ApplicantAction::Company(_)
            | ApplicantAction::VerifyLinkedin
            | ApplicantAction::VerifyResume
            | ApplicantAction::VerifyMember
    );
    if form_button && step.reply == Reply::Nothing {
        return MenuOutcome::Stale;
    }
    match action {
        ApplicantAction::Company(_) => MenuOutcome::Delete,
        _ => MenuOutcome::Keep,
    }
}

/// Handle commands and the answers applicants type into the form
pub async fn handle_text_message(
    bot: Bot,
    msg: Message,
    settings: Arc<Settings>,
    storage: Arc<dyn StorageTrait>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let target = ReplyTarget::new(bot, msg.chat.id, settings, storage);
    if !accepts_chat(msg.chat.is_private(), target.chat_id, target.settings.admin_id) {
        log::debug!("Ignoring message from chat {}", msg.chat.id);
        return Ok(());
    }
    log::debug!("Message from chat {}: {:?}", msg.chat.id, text);

    if text.starts_with('/') {
        return match Command::parse(text, &target.settings.bot_username) {
            Ok(cmd) => execute_command(&target, msg.from.as_ref(), cmd).await,
            Err(e) => {
                log::info!("Chat {} sent an unknown command {:?}: {}", msg.chat.id, text, e);
                target.send(prompts::unknown_command()).await?;
                Ok(())
            }
        };
    }

    let applicant = match target.applicants().get_applicant(target.chat_id).await {
        Ok(applicant) => applicant.unwrap_or_default(),
        Err(e) => return target.report_error(e).await,
    };
    let step = on_text(applicant.state, text, &applicant.data);
    perform(&target, step).await
}

/// Handle callback queries from inline keyboard buttons
pub async fn handle_callback_query(
    bot: Bot,
    q: CallbackQuery,
    settings: Arc<Settings>,
    storage: Arc<dyn StorageTrait>,
) -> ResponseResult<()> {
    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let Some(message) = q.message.as_ref().and_then(|m| m.regular_message()) else {
        return Ok(());
    };
    let target = ReplyTarget::new(bot, message.chat.id, settings, storage);
    log::debug!("Callback {:?} from chat {}", data, target.chat_id);

    let action = match data.parse::<CallbackAction>() {
        Ok(action) => action,
        Err(e) => {
            log::warn!("Ignoring callback from chat {}: {}", target.chat_id, e);
            return Ok(());
        }
    };

    match action {
        CallbackAction::Review {
            decision,
            applicant,
        } => decide(&target, message.id, decision, applicant).await,
        CallbackAction::Applicant(action) => {
            let state = match target.applicants().get_applicant(target.chat_id).await {
                Ok(applicant) => applicant.and_then(|applicant| applicant.state),
                Err(e) => return target.report_error(e).await,
            };
            let step = on_callback(state, action, &target.settings.companies);
            match menu_outcome(action, &step) {
                MenuOutcome::Keep => {}
                MenuOutcome::Stale => {
                    log::warn!(
                        "Ignoring {:?} in chat {} (state {:?})",
                        action,
                        target.chat_id,
                        state
                    );
                    return Ok(());
                }
                MenuOutcome::Delete => {
                    if let Err(e) = target.bot.delete_message(target.chat_id, message.id).await {
                        log::warn!("Failed to delete company menu in chat {}: {}", target.chat_id, e);
                    }
                }
            }
            perform(&target, step).await
        }
    }
}

/// Persist a conversation step (field first, then state) and answer it
pub async fn perform(target: &ReplyTarget, step: Step) -> ResponseResult<()> {
    let applicants = target.applicants();
    if let Some(update) = step.update {
        if let Err(e) = applicants.update_application(target.chat_id, update).await {
            return target.report_error(e).await;
        }
    }
    if let Some(state) = step.state {
        log::info!("Chat {} moves to {:?}", target.chat_id, state);
        if let Err(e) = applicants.set_state(target.chat_id, state).await {
            return target.report_error(e).await;
        }
    }
    send_reply(target, step.reply).await
}

async fn send_reply(target: &ReplyTarget, reply: Reply) -> ResponseResult<()> {
    match reply {
        Reply::AskName => {
            target.send(prompts::ask_name()).await?;
        }
        Reply::CompanyMenu => {
            target
                .send_with_keyboard(
                    prompts::choose_company(),
                    company_menu(&target.settings.companies),
                )
                .await?;
        }
        Reply::AskCompanyName => {
            target.send(prompts::ask_company_name()).await?;
        }
        Reply::AskExpertise => {
            target.send(prompts::ask_expertise()).await?;
        }
        Reply::AskEmail => {
            target.send(prompts::ask_email()).await?;
        }
        Reply::AskMotivation => {
            target.send(prompts::ask_motivation()).await?;
        }
        Reply::VerificationMenu { editing } => {
            target
                .send_with_keyboard(prompts::choose_verification(editing), verification_menu())
                .await?;
        }
        Reply::AskLinkedin => {
            target.send(prompts::ask_linkedin()).await?;
        }
        Reply::AskResume => {
            target.send(prompts::ask_resume()).await?;
        }
        Reply::AskReferralName => {
            target.send(prompts::ask_referral_name()).await?;
        }
        Reply::AskReferralId => {
            target.send(prompts::ask_referral_id()).await?;
        }
        Reply::AskNew(field) => {
            target.send(prompts::ask_new(field)).await?;
        }
        Reply::Invalid(invalid) => {
            target.send(prompts::invalid(invalid)).await?;
        }
        Reply::UseButtons => {
            target.send(prompts::use_buttons()).await?;
        }
        Reply::EditMenu => {
            target
                .send_with_keyboard(prompts::choose_field(), edit_menu())
                .await?;
        }
        Reply::Profile => return show_profile(target).await,
        Reply::Finalize => return finalize_registration(target).await,
        Reply::Resubmit => return resubmit(target).await,
        Reply::Nothing => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::CompanyRoster, conversation::State};

    fn roster() -> CompanyRoster {
        CompanyRoster {
            companies: vec!["Acme".to_string()],
            other: "Other".to_string(),
        }
    }

    #[test]
    fn test_accepts_private_chats_and_reviewer() {
        let admin = ChatId(-100500);
        assert!(accepts_chat(true, ChatId(42), admin));
        assert!(accepts_chat(false, admin, admin));
        assert!(!accepts_chat(false, ChatId(-100600), admin));
    }

    #[test]
    fn test_company_menu_is_deleted_after_a_pick() {
        let companies = roster();
        let action = ApplicantAction::Company(0);

        let step = on_callback(Some(State::AwaitCompanySelection), action, &companies);
        assert_eq!(menu_outcome(action, &step), MenuOutcome::Delete);

        let step = on_callback(Some(State::AwaitCompanySelection), ApplicantAction::Company(1), &companies);
        assert_eq!(menu_outcome(ApplicantAction::Company(1), &step), MenuOutcome::Delete);

        let step = on_callback(Some(State::Completed), action, &companies);
        assert_eq!(menu_outcome(action, &step), MenuOutcome::Stale);
    }

    #[test]
    fn test_other_buttons_keep_their_menu() {
        let companies = roster();
        let step = on_callback(Some(State::Completed), ApplicantAction::ViewProfile, &companies);
        assert_eq!(menu_outcome(ApplicantAction::ViewProfile, &step), MenuOutcome::Keep);

        let step = on_callback(Some(State::AwaitVerification), ApplicantAction::VerifyResume, &companies);
        assert_eq!(menu_outcome(ApplicantAction::VerifyResume, &step), MenuOutcome::Keep);

        let step = on_callback(None, ApplicantAction::VerifyResume, &companies);
        assert_eq!(menu_outcome(ApplicantAction::VerifyResume, &step), MenuOutcome::Stale);
    }
}
