use botkit::{
    html,
    html::HtmlString,
    keyboard::{ButtonData, inline_keyboard},
};
use teloxide::types::{ChatId, InlineKeyboardMarkup};
use url::Url;

use crate::{
    application::Application,
    callback::{CallbackAction, Decision},
    menus::profile::render_with_application_fields,
    storages::Applicant,
};

/// Card sent to the reviewer
pub fn render_application_card(
    applicant: ChatId,
    application: &Application,
    resubmission: bool,
) -> HtmlString {
    let header = if resubmission {
        html!("📝 <b>Resubmitted membership application</b>")
    } else {
        html!("📝 <b>New membership application</b>")
    };
    render_with_application_fields(application, |fields| {
        html!(
            "{}\n🆔 <code>{}</code>\n\n{}",
            &header,
            applicant.0,
            fields
        )
    })
}

pub fn decision_menu(applicant: ChatId) -> InlineKeyboardMarkup {
    inline_keyboard([[
        ButtonData::callback(
            "✅ Approve",
            CallbackAction::Review {
                decision: Decision::Approve,
                applicant,
            },
        ),
        ButtonData::callback(
            "❌ Reject",
            CallbackAction::Review {
                decision: Decision::Reject,
                applicant,
            },
        ),
    ]])
}

/// Replaces the reviewer's card once a decision is made
pub fn decision_summary(name: Option<&str>, decision: Decision) -> HtmlString {
    let name = name.unwrap_or("the applicant");
    match decision {
        Decision::Approve => html!(
            "✅ The application of {} was approved and the group link was sent.",
            name
        ),
        Decision::Reject => html!(
            "❌ The application of {} was rejected and the applicant was notified.",
            name
        ),
    }
}

pub fn applicant_not_found() -> HtmlString {
    html!("❌ Error: applicant data was not found.")
}

pub fn not_a_reviewer() -> HtmlString {
    html!("⚠️ Only the reviewer can approve or reject applications.")
}

pub fn join_group_menu(group_link: &Url) -> InlineKeyboardMarkup {
    inline_keyboard([[ButtonData::url("👥 Join the group", group_link.clone())]])
}

/// Summary for /pending: one line per application waiting for a decision
pub fn render_pending_list(pending: &[(ChatId, Applicant)]) -> HtmlString {
    if pending.is_empty() {
        return html!("📭 No applications are waiting for review.");
    }
    let lines = pending.iter().map(|(chat_id, applicant)| {
        html!(
            "• <code>{}</code> {} ({})",
            chat_id.0,
            applicant.registered_name().unwrap_or("—"),
            applicant.data.company.as_deref().unwrap_or("—")
        )
    });
    html!(
        "⏳ <b>Applications waiting for review: {}</b>\n\n{}",
        pending.len(),
        HtmlString::join(lines, &html!("\n"))
    )
}
