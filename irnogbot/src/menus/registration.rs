use botkit::keyboard::{ButtonData, inline_keyboard};
use teloxide::types::InlineKeyboardMarkup;
use url::Url;

use crate::{
    callback::{ApplicantAction, CallbackAction},
    config::CompanyRoster,
};

const COMPANY_BUTTONS_PER_ROW: usize = 4;

fn button(label: &str, action: ApplicantAction) -> ButtonData {
    ButtonData::callback(label, CallbackAction::from(action))
}

/// Company buttons in roster order, the "other" entry last
pub fn company_menu(companies: &CompanyRoster) -> InlineKeyboardMarkup {
    let buttons: Vec<ButtonData> = companies
        .labels()
        .enumerate()
        .map(|(index, label)| button(label, ApplicantAction::Company(index)))
        .collect();
    inline_keyboard(
        buttons
            .chunks(COMPANY_BUTTONS_PER_ROW)
            .map(|row| row.to_vec()),
    )
}

pub fn verification_menu() -> InlineKeyboardMarkup {
    inline_keyboard([
        [button("🔗 LinkedIn profile", ApplicantAction::VerifyLinkedin)],
        [button("📄 Resume link", ApplicantAction::VerifyResume)],
        [button("👥 Referral by a member", ApplicantAction::VerifyMember)],
    ])
}

pub fn join_channel_menu(channel_link: &Url) -> InlineKeyboardMarkup {
    inline_keyboard([[ButtonData::url("📢 Join the channel", channel_link.clone())]])
}

#[cfg(test)]
mod tests {
    use teloxide::types::InlineKeyboardButtonKind;

    use super::*;

    fn callback_data(markup: &InlineKeyboardMarkup) -> Vec<Vec<String>> {
        markup
            .inline_keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| match &button.kind {
                        InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
                        other => panic!("Unexpected button kind {:?}", other),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_company_menu_layout() {
        let markup = company_menu(&CompanyRoster::default());
        let data = callback_data(&markup);

        assert_eq!(data.len(), 3);
        assert!(data.iter().all(|row| row.len() == 4));
        assert_eq!(data[0][0], "company_0");
        assert_eq!(data[2][3], "company_11");
        assert_eq!(markup.inline_keyboard[2][3].text, "Other");
    }

    #[test]
    fn test_short_roster_keeps_last_row() {
        let roster = CompanyRoster {
            companies: vec!["Acme".to_string()],
            other: "Something else".to_string(),
        };
        let data = callback_data(&company_menu(&roster));
        assert_eq!(data, vec![vec!["company_0", "company_1"]]);
    }

    #[test]
    fn test_verification_menu() {
        let data = callback_data(&verification_menu());
        assert_eq!(
            data,
            vec![
                vec!["verify_linkedin"],
                vec!["verify_resume"],
                vec!["verify_member"]
            ]
        );
    }
}
