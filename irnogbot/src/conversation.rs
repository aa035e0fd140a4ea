//! Registration conversation: what each applicant is expected to send next and
//! how every text message or button press moves them through the form.
//!
//! The functions here are pure. They return a [`Step`] which the handlers persist
//! (field update first, then the new state) before sending the reply.

use serde::{Deserialize, Serialize};

use crate::{
    application::{Application, ApplicationUpdate, Verification},
    callback::ApplicantAction,
    config::{CompanyChoice, CompanyRoster},
    validation::{is_valid_email, is_valid_linkedin_url, is_valid_url},
};

/// Conversation state of a single applicant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    AwaitName,
    AwaitCompanySelection,
    AwaitCompanyInput,
    AwaitExpertise,
    AwaitEmail,
    AwaitMotivation,
    AwaitVerification,
    AwaitLinkedin,
    AwaitResume,
    AwaitReferralName,
    AwaitReferralId,
    EditName,
    EditCompanySelection,
    EditCompanyInput,
    EditExpertise,
    EditEmail,
    EditMotivation,
    ProfileEdit,
    Completed,
}

/// Profile fields that can be edited one by one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Company,
    Expertise,
    Email,
    Motivation,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Company,
        Field::Expertise,
        Field::Email,
        Field::Motivation,
    ];

    /// Key used in callback data
    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Company => "company",
            Field::Expertise => "expertise",
            Field::Email => "email",
            Field::Motivation => "motivation",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Full name",
            Field::Company => "Company",
            Field::Expertise => "Expertise",
            Field::Email => "E-mail",
            Field::Motivation => "Motivation letter",
        }
    }

    /// State waiting for the new value of this field
    pub fn edit_state(&self) -> State {
        match self {
            Field::Name => State::EditName,
            Field::Company => State::EditCompanySelection,
            Field::Expertise => State::EditExpertise,
            Field::Email => State::EditEmail,
            Field::Motivation => State::EditMotivation,
        }
    }

    fn update(&self, value: String) -> ApplicationUpdate {
        match self {
            Field::Name => ApplicationUpdate::Name(value),
            Field::Company => ApplicationUpdate::Company(value),
            Field::Expertise => ApplicationUpdate::Expertise(value),
            Field::Email => ApplicationUpdate::Email(value),
            Field::Motivation => ApplicationUpdate::Motivation(value),
        }
    }
}

/// Input the applicant sent that did not pass validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalid {
    LinkedinUrl,
    ResumeUrl,
    Email,
}

/// What the bot answers after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    AskName,
    CompanyMenu,
    AskCompanyName,
    AskExpertise,
    AskEmail,
    AskMotivation,
    VerificationMenu { editing: bool },
    AskLinkedin,
    AskResume,
    AskReferralName,
    AskReferralId,
    AskNew(Field),
    Invalid(Invalid),
    UseButtons,
    Profile,
    EditMenu,
    /// Application is complete: forward it to the reviewer
    Finalize,
    Resubmit,
    Nothing,
}

/// Result of handling one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub update: Option<ApplicationUpdate>,
    pub state: Option<State>,
    pub reply: Reply,
}

impl Step {
    fn reply(reply: Reply) -> Self {
        Self {
            update: None,
            state: None,
            reply,
        }
    }

    fn goto(state: State, reply: Reply) -> Self {
        Self {
            update: None,
            state: Some(state),
            reply,
        }
    }

    fn save(update: ApplicationUpdate, state: State, reply: Reply) -> Self {
        Self {
            update: Some(update),
            state: Some(state),
            reply,
        }
    }

    pub fn ignore() -> Self {
        Self::reply(Reply::Nothing)
    }
}

/// First step of a new application
pub fn start_registration() -> Step {
    Step::goto(State::AwaitName, Reply::AskName)
}

/// Handle free text sent by the applicant
pub fn on_text(state: Option<State>, text: &str, application: &Application) -> Step {
    let value = text.trim().to_string();
    let Some(state) = state else {
        return Step::ignore();
    };
    if value.is_empty() {
        return Step::ignore();
    }
    match state {
        State::AwaitName => Step::save(
            ApplicationUpdate::Name(value),
            State::AwaitCompanySelection,
            Reply::CompanyMenu,
        ),
        State::AwaitCompanyInput => Step::save(
            ApplicationUpdate::Company(value),
            State::AwaitExpertise,
            Reply::AskExpertise,
        ),
        State::AwaitExpertise => Step::save(
            ApplicationUpdate::Expertise(value),
            State::AwaitEmail,
            Reply::AskEmail,
        ),
        State::AwaitEmail | State::EditEmail if !is_valid_email(&value) => {
            Step::reply(Reply::Invalid(Invalid::Email))
        }
        State::AwaitEmail => Step::save(
            ApplicationUpdate::Email(value),
            State::AwaitMotivation,
            Reply::AskMotivation,
        ),
        State::AwaitMotivation => Step::save(
            ApplicationUpdate::Motivation(value),
            State::AwaitVerification,
            Reply::VerificationMenu { editing: false },
        ),
        State::AwaitLinkedin if !is_valid_linkedin_url(&value) => {
            Step::reply(Reply::Invalid(Invalid::LinkedinUrl))
        }
        State::AwaitLinkedin => Step::save(
            ApplicationUpdate::Verification(Verification::Linkedin { value }),
            State::Completed,
            Reply::Finalize,
        ),
        State::AwaitResume if !is_valid_url(&value) => {
            Step::reply(Reply::Invalid(Invalid::ResumeUrl))
        }
        State::AwaitResume => Step::save(
            ApplicationUpdate::Verification(Verification::Resume { value }),
            State::Completed,
            Reply::Finalize,
        ),
        State::AwaitReferralName => Step::save(
            ApplicationUpdate::ReferralName(value),
            State::AwaitReferralId,
            Reply::AskReferralId,
        ),
        State::AwaitReferralId => Step::save(
            ApplicationUpdate::Verification(Verification::Referral {
                value,
                ref_name: application.referral_name.clone(),
            }),
            State::Completed,
            Reply::Finalize,
        ),
        State::EditName => edited(Field::Name, value),
        State::EditCompanyInput => edited(Field::Company, value),
        State::EditExpertise => edited(Field::Expertise, value),
        State::EditEmail => edited(Field::Email, value),
        State::EditMotivation => edited(Field::Motivation, value),
        State::AwaitCompanySelection | State::EditCompanySelection | State::AwaitVerification => {
            Step::reply(Reply::UseButtons)
        }
        State::ProfileEdit | State::Completed => Step::ignore(),
    }
}

fn edited(field: Field, value: String) -> Step {
    Step::save(field.update(value), State::ProfileEdit, Reply::Profile)
}

/// Handle an inline button pressed by the applicant
pub fn on_callback(
    state: Option<State>,
    action: ApplicantAction,
    companies: &CompanyRoster,
) -> Step {
    match action {
        ApplicantAction::Company(index) => on_company(state, index, companies),
        ApplicantAction::VerifyLinkedin | ApplicantAction::VerifyResume | ApplicantAction::VerifyMember
            if !choosing_verification(state) =>
        {
            Step::ignore()
        }
        ApplicantAction::VerifyLinkedin => Step::goto(State::AwaitLinkedin, Reply::AskLinkedin),
        ApplicantAction::VerifyResume => Step::goto(State::AwaitResume, Reply::AskResume),
        ApplicantAction::VerifyMember => {
            Step::goto(State::AwaitReferralName, Reply::AskReferralName)
        }
        ApplicantAction::ViewProfile => Step::reply(Reply::Profile),
        ApplicantAction::EditProfile => Step::reply(Reply::EditMenu),
        ApplicantAction::Edit(Field::Company) => {
            Step::goto(Field::Company.edit_state(), Reply::CompanyMenu)
        }
        ApplicantAction::Edit(field) => Step::goto(field.edit_state(), Reply::AskNew(field)),
        ApplicantAction::EditVerification => Step::goto(
            State::AwaitVerification,
            Reply::VerificationMenu { editing: true },
        ),
        ApplicantAction::Resubmit => Step::reply(Reply::Resubmit),
    }
}

/// The verification menu is on screen, possibly with a method already picked
fn choosing_verification(state: Option<State>) -> bool {
    matches!(
        state,
        Some(
            State::AwaitVerification
                | State::AwaitLinkedin
                | State::AwaitResume
                | State::AwaitReferralName
                | State::AwaitReferralId
        )
    )
}

fn on_company(state: Option<State>, index: usize, companies: &CompanyRoster) -> Step {
    let editing = match state {
        Some(State::AwaitCompanySelection) => false,
        Some(State::EditCompanySelection) => true,
        // Stale menu from an earlier step
        _ => return Step::ignore(),
    };
    match (companies.choice(index), editing) {
        (Some(CompanyChoice::Named(company)), false) => Step::save(
            ApplicationUpdate::Company(company.to_string()),
            State::AwaitExpertise,
            Reply::AskExpertise,
        ),
        (Some(CompanyChoice::Named(company)), true) => {
            edited(Field::Company, company.to_string())
        }
        (Some(CompanyChoice::Other), false) => {
            Step::goto(State::AwaitCompanyInput, Reply::AskCompanyName)
        }
        (Some(CompanyChoice::Other), true) => {
            Step::goto(State::EditCompanyInput, Reply::AskCompanyName)
        }
        (None, _) => Step::ignore(),
    }
}
