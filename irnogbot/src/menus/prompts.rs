use botkit::{html, html::HtmlString};

use crate::conversation::{Field, Invalid};

pub fn welcome_join_channel() -> HtmlString {
    html!(
        "Hello 👋\n\n\
         Welcome to the <b>IRNOG</b> membership bot! 🌟\n\n\
         IRNOG is a professional group with transparent processes where technical and \
         executive experts of the Iranian Internet:\n\n\
         🔹 propose expert recommendations to improve Internet access\n\
         🔹 study ways to increase Internet penetration and efficiency\n\
         🔹 take part in policy making groups and organisations\n\
         🔹 exchange experience and technical knowledge\n\n\
         ❗️ Before registering, please join the IRNOG Telegram channel and send /start again:"
    )
}

pub fn greeting(name: &str) -> HtmlString {
    html!(
        "Hello dear {} 👋\n\nWelcome back. Choose an option from the menu below:",
        name
    )
}

pub fn ask_name() -> HtmlString {
    html!("Please enter your full name:")
}

pub fn choose_company() -> HtmlString {
    html!("Please choose your company from the list below:")
}

pub fn ask_company_name() -> HtmlString {
    html!("Please enter the name of your company:")
}

pub fn ask_expertise() -> HtmlString {
    html!("Please enter your field of expertise:")
}

pub fn ask_email() -> HtmlString {
    html!("Please enter your corporate e-mail address:")
}

fn motivation_questions() -> HtmlString {
    html!(
        "1. What experience do you have in running and developing Internet networks?\n\
         2. How can you help improve Internet access in Iran?\n\
         3. What is your view on the current challenges of the Iranian Internet and how would you address them?\n\
         4. How can you contribute to the advisory and strategic activities of IRNOG?"
    )
}

pub fn ask_motivation() -> HtmlString {
    html!(
        "Please write your motivation letter answering these questions:\n\n{}",
        motivation_questions()
    )
}

pub fn choose_verification(editing: bool) -> HtmlString {
    if editing {
        html!("Please choose the new verification method:")
    } else {
        html!("Please choose how you want to verify your identity:")
    }
}

pub fn ask_linkedin() -> HtmlString {
    html!("Please send the link to your LinkedIn profile (it must be a valid link):")
}

pub fn ask_resume() -> HtmlString {
    html!("Please send a link to your resume (it must be a valid link):")
}

pub fn ask_referral_name() -> HtmlString {
    html!("Please enter the full name of the member who refers you:")
}

pub fn ask_referral_id() -> HtmlString {
    html!("Please enter the Telegram id of the member who refers you:")
}

pub fn ask_new(field: Field) -> HtmlString {
    match field {
        Field::Name => html!("Please enter your new full name:"),
        Field::Company => choose_company(),
        Field::Expertise => html!("Please enter your new field of expertise:"),
        Field::Email => html!("Please enter your new e-mail address:"),
        Field::Motivation => html!(
            "Please write your new motivation letter answering these questions:\n\n{}",
            motivation_questions()
        ),
    }
}

pub fn invalid(invalid: Invalid) -> HtmlString {
    match invalid {
        Invalid::LinkedinUrl => {
            html!("❌ The link is not valid. Please send a valid LinkedIn profile link:")
        }
        Invalid::ResumeUrl => html!("❌ The link is not valid. Please send a valid link to your resume:"),
        Invalid::Email => html!("❌ The e-mail address is not valid. Please enter a valid e-mail:"),
    }
}

pub fn use_buttons() -> HtmlString {
    html!("Please use the buttons of the menu above.")
}

pub fn unknown_command() -> HtmlString {
    html!("❓ Unknown command. Send /help to see what I can do.")
}

pub fn choose_field() -> HtmlString {
    html!("Please choose the field you want to edit:")
}

pub fn no_profile() -> HtmlString {
    html!("You have not registered yet. Please use /start to register.")
}

pub fn registration_received() -> HtmlString {
    html!(
        "✅ Your information has been saved.\n\n\
         Your application will be reviewed by the PC team. After approval the group link \
         will be sent to you.\n\n\
         Thank you for joining IRNOG 🌟"
    )
}

pub fn nothing_to_resubmit() -> HtmlString {
    html!("There is nothing to resubmit. Please register with /start first.")
}

pub fn incomplete_application() -> HtmlString {
    html!("Your application is incomplete. Please fill in the missing fields with \"Edit profile\" and then send it for review.")
}

pub fn resubmitted() -> HtmlString {
    html!("✅ Your application has been resubmitted for review. You will be notified of the result.")
}

pub fn approved(group_link: &str) -> HtmlString {
    html!(
        "🎉 <b>Congratulations!</b>\n\n\
         Your membership application to IRNOG has been approved.\n\n\
         Use the link below to join the main group:\n{}",
        group_link
    )
}

pub fn rejected() -> HtmlString {
    html!(
        "❌ <b>Notice</b>\n\n\
         Unfortunately your membership application to IRNOG was not approved at this stage.\n\n\
         You may complete your information and resubmit your application."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_escapes_name() {
        assert_eq!(
            greeting("<Ali & co>").as_str(),
            "Hello dear &lt;Ali &amp; co&gt; 👋\n\nWelcome back. Choose an option from the menu below:"
        );
    }

    #[test]
    fn test_motivation_prompts_contain_questions() {
        assert!(ask_motivation().as_str().contains("4. How can you contribute"));
        assert!(ask_new(Field::Motivation).as_str().contains("1. What experience"));
        assert_eq!(ask_new(Field::Company), choose_company());
    }
}
