use botkit::{
    html,
    html::{HtmlString, TELEGRAM_MAX_MESSAGE_LENGTH},
    keyboard::{ButtonData, inline_keyboard},
};
use teloxide::{prelude::ResponseResult, types::InlineKeyboardMarkup};

use crate::{
    application::{Application, Verification},
    callback::{ApplicantAction, CallbackAction},
    conversation::Field,
    menus::prompts,
    target::ReplyTarget,
};

fn button(label: &str, action: ApplicantAction) -> ButtonData {
    ButtonData::callback(label, CallbackAction::from(action))
}

fn value_or_dash(value: &Option<String>) -> HtmlString {
    match value {
        Some(value) => HtmlString::from(value),
        None => html!("—"),
    }
}

pub fn render_verification(verification: &Verification) -> HtmlString {
    match verification {
        Verification::Linkedin { value } => html!("🔗 <b>LinkedIn:</b>\n{}", value),
        Verification::Resume { value } => html!("📄 <b>Resume:</b>\n{}", value),
        Verification::Referral { value, ref_name } => html!(
            "👥 <b>Referred by:</b>\n{} ({})",
            value_or_dash(ref_name),
            value
        ),
    }
}

fn application_fields(application: &Application, motivation: HtmlString) -> HtmlString {
    let fields = html!(
        "👤 <b>Full name:</b> {}\n\
         🏢 <b>Company:</b> {}\n\
         💼 <b>Expertise:</b> {}\n\
         📧 <b>E-mail:</b> {}\n\n\
         📋 <b>Motivation letter:</b>\n{}\n",
        value_or_dash(&application.name),
        value_or_dash(&application.company),
        value_or_dash(&application.expertise),
        value_or_dash(&application.email),
        motivation
    );
    match &application.verification {
        Some(verification) => fields + html!("\n{}\n", render_verification(verification)),
        None => fields,
    }
}

/// Render the fields shared by the applicant's profile and the reviewer's card
/// inside `layout`. The motivation letter is shortened so the whole text fits
/// one message and the lines after it are never cut off.
pub fn render_with_application_fields(
    application: &Application,
    layout: impl Fn(HtmlString) -> HtmlString,
) -> HtmlString {
    let Some(motivation) = &application.motivation else {
        return layout(application_fields(application, html!("—")));
    };
    let frame = layout(application_fields(application, HtmlString::new()))
        .as_str()
        .chars()
        .count();
    let budget = TELEGRAM_MAX_MESSAGE_LENGTH.saturating_sub(frame);
    layout(application_fields(
        application,
        HtmlString::escape_truncated(motivation, budget),
    ))
}

pub fn render_profile(application: &Application) -> HtmlString {
    render_with_application_fields(application, |fields| {
        html!(
            "🔖 <b>Your profile</b>\n\n{}\n🔍 <b>Application status:</b> {}",
            fields,
            application.status().label()
        )
    })
}

pub fn profile_menu() -> InlineKeyboardMarkup {
    inline_keyboard([
        [button("✏️ Edit profile", ApplicantAction::EditProfile)],
        [button("📨 Resubmit for review", ApplicantAction::Resubmit)],
    ])
}

/// Menu shown to returning applicants on /start
pub fn main_menu() -> InlineKeyboardMarkup {
    inline_keyboard([
        [button("🔖 View profile", ApplicantAction::ViewProfile)],
        [button("✏️ Edit profile", ApplicantAction::EditProfile)],
        [button("📨 Resubmit for review", ApplicantAction::Resubmit)],
    ])
}

pub fn edit_menu() -> InlineKeyboardMarkup {
    let fields = Field::ALL
        .into_iter()
        .map(|field| vec![button(field.label(), ApplicantAction::Edit(field))]);
    let tail = [
        vec![button(
            "Verification method",
            ApplicantAction::EditVerification,
        )],
        vec![button("↩️ Back", ApplicantAction::ViewProfile)],
    ];
    inline_keyboard(fields.chain(tail))
}

/// Send the stored profile of the target chat, or a hint to register first
pub async fn show_profile(target: &ReplyTarget) -> ResponseResult<()> {
    let applicant = match target.applicants().get_applicant(target.chat_id).await {
        Ok(applicant) => applicant,
        Err(e) => return target.report_error(e).await,
    };
    match applicant {
        Some(applicant) if !applicant.data.is_empty() => {
            target
                .send_with_keyboard(render_profile(&applicant.data), profile_menu())
                .await?;
        }
        _ => {
            target.send(prompts::no_profile()).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use teloxide::types::InlineKeyboardButtonKind;

    use super::*;
    use crate::application::ApplicationStatus;

    #[test]
    fn test_render_profile_escapes_values() {
        let application = Application {
            name: Some("Sara <admin>".to_string()),
            company: Some("AT&T".to_string()),
            verification: Some(Verification::Resume {
                value: "https://example.com/cv?a=1&b=2".to_string(),
            }),
            status: Some(ApplicationStatus::Approved),
            ..Default::default()
        };
        let text = render_profile(&application);

        assert!(text.as_str().starts_with("🔖 <b>Your profile</b>\n\n"));
        assert!(text.as_str().contains("<b>Full name:</b> Sara &lt;admin&gt;\n"));
        assert!(text.as_str().contains("<b>Company:</b> AT&amp;T\n"));
        assert!(text.as_str().contains("<b>Expertise:</b> —\n"));
        assert!(text.as_str().contains("https://example.com/cv?a=1&amp;b=2"));
        assert!(text.as_str().ends_with("<b>Application status:</b> ✅ Approved"));
    }

    #[test]
    fn test_long_motivation_keeps_status_line() {
        let application = Application {
            name: Some("Sara".to_string()),
            motivation: Some("<transit> & peering ".repeat(400)),
            verification: Some(Verification::Resume {
                value: "https://example.com/cv".to_string(),
            }),
            ..Default::default()
        };
        let text = render_profile(&application);

        assert!(text.as_str().chars().count() <= TELEGRAM_MAX_MESSAGE_LENGTH);
        assert!(text.as_str().contains("https://example.com/cv"));
        assert!(text.as_str().ends_with("<b>Application status:</b> ⏳ Pending review"));
    }

    #[test]
    fn test_short_motivation_is_kept_whole() {
        let application = Application {
            motivation: Some("I run an IXP".to_string()),
            ..Default::default()
        };
        assert!(render_profile(&application)
            .as_str()
            .contains("<b>Motivation letter:</b>\nI run an IXP\n"));
    }

    #[test]
    fn test_render_referral_without_name() {
        let verification = Verification::Referral {
            value: "@maryam".to_string(),
            ref_name: None,
        };
        assert_eq!(
            render_verification(&verification).as_str(),
            "👥 <b>Referred by:</b>\n— (@maryam)"
        );
    }

    #[test]
    fn test_edit_menu_buttons() {
        let markup = edit_menu();
        let data: Vec<String> = markup
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|button| match &button.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            data,
            vec![
                "edit_name",
                "edit_company",
                "edit_expertise",
                "edit_email",
                "edit_motivation",
                "edit_verification",
                "view_profile",
            ]
        );
    }
}
