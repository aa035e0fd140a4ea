//! Handing applications over to the reviewer and applying the decision.

use botkit::html::{HtmlString, HtmlStringMessage};
use teloxide::{prelude::*, types::MessageId};

use crate::{
    application::{Application, ApplicationStatus, ApplicationUpdate},
    callback::Decision,
    menus::{
        profile::show_profile,
        prompts,
        review::{
            applicant_not_found, decision_menu, decision_summary, join_group_menu,
            not_a_reviewer, render_application_card,
        },
    },
    storages::{Applicant, AuditEvent},
    target::ReplyTarget,
};

/// Whether a stored application can be sent to the reviewer
#[derive(Debug, PartialEq, Eq)]
enum Readiness {
    Empty,
    Incomplete,
    Ready(Application),
}

fn readiness(applicant: Option<Applicant>) -> Readiness {
    match applicant.map(|applicant| applicant.data) {
        None => Readiness::Empty,
        Some(application) if application.is_empty() => Readiness::Empty,
        Some(application) if !application.is_complete() => Readiness::Incomplete,
        Some(application) => Readiness::Ready(application),
    }
}

/// Outcome of a decision button
#[derive(Debug, PartialEq, Eq)]
enum Ruling {
    NotReviewer,
    UnknownApplicant,
    Apply {
        status: ApplicationStatus,
        name: Option<String>,
    },
}

fn rule(is_reviewer: bool, applicant: Option<Applicant>, decision: Decision) -> Ruling {
    if !is_reviewer {
        return Ruling::NotReviewer;
    }
    let Some(applicant) = applicant.filter(|applicant| !applicant.data.is_empty()) else {
        return Ruling::UnknownApplicant;
    };
    let status = match decision {
        Decision::Approve => ApplicationStatus::Approved,
        Decision::Reject => ApplicationStatus::Rejected,
    };
    Ruling::Apply {
        status,
        name: applicant.data.name,
    }
}

async fn forward_to_reviewer(
    target: &ReplyTarget,
    application: &Application,
    resubmission: bool,
) -> ResponseResult<()> {
    let reviewer = target.for_chat(target.settings.admin_id);
    reviewer
        .send_with_keyboard(
            render_application_card(target.chat_id, application, resubmission),
            decision_menu(target.chat_id),
        )
        .await?;
    log::info!(
        "Application of {} forwarded to reviewer {} (resubmission: {})",
        target.chat_id,
        reviewer.chat_id,
        resubmission
    );
    let event = AuditEvent::Forwarded {
        applicant: target.chat_id,
        resubmission,
    };
    if let Err(e) = target.audit_log().record(event).await {
        log::warn!("Audit log unavailable: {}", e);
    }
    Ok(())
}

/// Mark the application pending and return it as stored
async fn mark_pending(target: &ReplyTarget) -> Result<Option<Application>, HtmlString> {
    let applicants = target.applicants();
    applicants
        .update_application(
            target.chat_id,
            ApplicationUpdate::Status(ApplicationStatus::Pending),
        )
        .await?;
    Ok(applicants
        .get_applicant(target.chat_id)
        .await?
        .map(|applicant| applicant.data))
}

/// The applicant just answered the last question
pub async fn finalize_registration(target: &ReplyTarget) -> ResponseResult<()> {
    let applicant = match target.applicants().get_applicant(target.chat_id).await {
        Ok(applicant) => applicant,
        Err(e) => return target.report_error(e).await,
    };
    if !matches!(readiness(applicant), Readiness::Ready(_)) {
        log::warn!("Chat {} finished the form with missing fields", target.chat_id);
        target.send(prompts::incomplete_application()).await?;
        return Ok(());
    }
    let application = match mark_pending(target).await {
        Ok(Some(application)) => application,
        Ok(None) => return Ok(()),
        Err(e) => return target.report_error(e).await,
    };
    forward_to_reviewer(target, &application, false).await?;
    target.send(prompts::registration_received()).await?;
    show_profile(target).await
}

/// Send an existing application for another review
pub async fn resubmit(target: &ReplyTarget) -> ResponseResult<()> {
    let applicant = match target.applicants().get_applicant(target.chat_id).await {
        Ok(applicant) => applicant,
        Err(e) => return target.report_error(e).await,
    };
    let application = match readiness(applicant) {
        Readiness::Empty => {
            target.send(prompts::nothing_to_resubmit()).await?;
            return Ok(());
        }
        Readiness::Incomplete => {
            target.send(prompts::incomplete_application()).await?;
            return Ok(());
        }
        Readiness::Ready(application) => application,
    };
    let application = match mark_pending(target).await {
        Ok(stored) => stored.unwrap_or(application),
        Err(e) => return target.report_error(e).await,
    };
    forward_to_reviewer(target, &application, true).await?;
    target.send(prompts::resubmitted()).await?;
    Ok(())
}

/// Reviewer pressed Approve or Reject on the card in `message_id`
pub async fn decide(
    target: &ReplyTarget,
    message_id: MessageId,
    decision: Decision,
    applicant_id: ChatId,
) -> ResponseResult<()> {
    let applicants = target.applicants();
    let applicant = if target.is_admin() {
        match applicants.get_applicant(applicant_id).await {
            Ok(applicant) => applicant,
            Err(e) => return target.report_error(e).await,
        }
    } else {
        None
    };

    let (status, name) = match rule(target.is_admin(), applicant, decision) {
        Ruling::NotReviewer => {
            log::warn!(
                "Chat {} tried to decide on the application of {}",
                target.chat_id,
                applicant_id
            );
            target.send(not_a_reviewer()).await?;
            return Ok(());
        }
        Ruling::UnknownApplicant => {
            log::warn!("Decision on unknown applicant {}", applicant_id);
            target
                .bot
                .edit_html_message_text(target.chat_id, message_id, applicant_not_found())
                .await?;
            return Ok(());
        }
        Ruling::Apply { status, name } => (status, name),
    };

    if let Err(e) = applicants
        .update_application(applicant_id, ApplicationUpdate::Status(status))
        .await
    {
        return target.report_error(e).await;
    }
    log::info!("Application of {} ({:?}) {}", applicant_id, name, decision);

    let applicant_chat = target.for_chat(applicant_id);
    let group_link = &target.settings.group_link;
    let notified = match decision {
        Decision::Approve => {
            applicant_chat
                .send_with_keyboard(
                    prompts::approved(group_link.as_str()),
                    join_group_menu(group_link),
                )
                .await
        }
        Decision::Reject => applicant_chat.send(prompts::rejected()).await,
    };
    if let Err(e) = notified {
        log::warn!("Failed to notify applicant {}: {}", applicant_id, e);
    }

    target
        .bot
        .edit_html_message_text(
            target.chat_id,
            message_id,
            decision_summary(name.as_deref(), decision),
        )
        .await?;

    let event = AuditEvent::Decided {
        applicant: applicant_id,
        name,
        decision,
    };
    if let Err(e) = target.audit_log().record(event).await {
        log::warn!("Audit log unavailable: {}", e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{application::Verification, conversation::State};

    fn applicant(data: Application) -> Option<Applicant> {
        Some(Applicant {
            state: Some(State::Completed),
            data,
        })
    }

    fn complete_application() -> Application {
        Application {
            name: Some("Sara Karimi".to_string()),
            company: Some("Snapp".to_string()),
            expertise: Some("BGP".to_string()),
            email: Some("sara@snapp.ir".to_string()),
            motivation: Some("Peering".to_string()),
            referral_name: None,
            verification: Some(Verification::Resume {
                value: "https://example.com/cv".to_string(),
            }),
            status: Some(ApplicationStatus::Approved),
        }
    }

    #[test]
    fn test_readiness() {
        assert_eq!(readiness(None), Readiness::Empty);
        assert_eq!(readiness(applicant(Application::default())), Readiness::Empty);

        // a verification alone, as left by a stale button, is not an application
        let verification_only = Application {
            verification: Some(Verification::Linkedin {
                value: "https://linkedin.com/in/x".to_string(),
            }),
            ..Application::default()
        };
        assert_eq!(readiness(applicant(verification_only)), Readiness::Incomplete);

        let complete = complete_application();
        assert_eq!(
            readiness(applicant(complete.clone())),
            Readiness::Ready(complete)
        );
    }

    #[test]
    fn test_only_reviewer_may_decide() {
        assert_eq!(
            rule(false, applicant(complete_application()), Decision::Approve),
            Ruling::NotReviewer
        );
    }

    #[test]
    fn test_decision_on_unknown_applicant() {
        assert_eq!(rule(true, None, Decision::Approve), Ruling::UnknownApplicant);
        assert_eq!(
            rule(true, applicant(Application::default()), Decision::Reject),
            Ruling::UnknownApplicant
        );
    }

    #[test]
    fn test_decision_sets_status() {
        assert_eq!(
            rule(true, applicant(complete_application()), Decision::Approve),
            Ruling::Apply {
                status: ApplicationStatus::Approved,
                name: Some("Sara Karimi".to_string()),
            }
        );
        assert_eq!(
            rule(true, applicant(complete_application()), Decision::Reject),
            Ruling::Apply {
                status: ApplicationStatus::Rejected,
                name: Some("Sara Karimi".to_string()),
            }
        );
    }
}
