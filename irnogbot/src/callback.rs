use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use teloxide::types::ChatId;

use crate::conversation::Field;

static COMPANY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^company_(\d{1,4})$").expect("valid company regex"));
static DECISION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(approve|reject)_(-?\d{1,19})$").expect("valid decision regex")
});

/// Reviewer verdict on an application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Approve => write!(f, "approved"),
            Decision::Reject => write!(f, "rejected"),
        }
    }
}

/// Buttons pressed by an applicant in their own chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicantAction {
    /// Index into the company roster
    Company(usize),
    VerifyLinkedin,
    VerifyResume,
    VerifyMember,
    ViewProfile,
    EditProfile,
    Edit(Field),
    EditVerification,
    Resubmit,
}

/// Parsed inline button payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Applicant(ApplicantAction),
    Review {
        decision: Decision,
        applicant: ChatId,
    },
}

impl From<ApplicantAction> for CallbackAction {
    fn from(action: ApplicantAction) -> Self {
        CallbackAction::Applicant(action)
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::Applicant(action) => match action {
                ApplicantAction::Company(index) => write!(f, "company_{}", index),
                ApplicantAction::VerifyLinkedin => write!(f, "verify_linkedin"),
                ApplicantAction::VerifyResume => write!(f, "verify_resume"),
                ApplicantAction::VerifyMember => write!(f, "verify_member"),
                ApplicantAction::ViewProfile => write!(f, "view_profile"),
                ApplicantAction::EditProfile => write!(f, "edit_profile"),
                ApplicantAction::Edit(field) => write!(f, "edit_{}", field.key()),
                ApplicantAction::EditVerification => write!(f, "edit_verification"),
                ApplicantAction::Resubmit => write!(f, "resubmit_profile"),
            },
            CallbackAction::Review {
                decision: Decision::Approve,
                applicant,
            } => write!(f, "approve_{}", applicant.0),
            CallbackAction::Review {
                decision: Decision::Reject,
                applicant,
            } => write!(f, "reject_{}", applicant.0),
        }
    }
}

impl FromStr for CallbackAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(caps) = DECISION_RE.captures(s) {
            let decision = match &caps[1] {
                "approve" => Decision::Approve,
                _ => Decision::Reject,
            };
            let applicant = caps[2]
                .parse::<i64>()
                .map_err(|e| format!("Invalid applicant id in `{}`: {}", s, e))?;
            return Ok(CallbackAction::Review {
                decision,
                applicant: ChatId(applicant),
            });
        }
        if let Some(caps) = COMPANY_RE.captures(s) {
            let index = caps[1]
                .parse::<usize>()
                .map_err(|e| format!("Invalid company index in `{}`: {}", s, e))?;
            return Ok(ApplicantAction::Company(index).into());
        }
        let action = match s {
            "verify_linkedin" => ApplicantAction::VerifyLinkedin,
            "verify_resume" => ApplicantAction::VerifyResume,
            "verify_member" => ApplicantAction::VerifyMember,
            "view_profile" => ApplicantAction::ViewProfile,
            "edit_profile" => ApplicantAction::EditProfile,
            "edit_verification" => ApplicantAction::EditVerification,
            "resubmit_profile" => ApplicantAction::Resubmit,
            other => match other.strip_prefix("edit_").and_then(Field::from_key) {
                Some(field) => ApplicantAction::Edit(field),
                None => return Err(format!("Unknown callback data `{}`", s)),
            },
        };
        Ok(action.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_review_decisions() {
        assert_eq!(
            "approve_123456789".parse::<CallbackAction>(),
            Ok(CallbackAction::Review {
                decision: Decision::Approve,
                applicant: ChatId(123456789),
            })
        );
        assert_eq!(
            "reject_-42".parse::<CallbackAction>(),
            Ok(CallbackAction::Review {
                decision: Decision::Reject,
                applicant: ChatId(-42),
            })
        );
        assert!("approve_".parse::<CallbackAction>().is_err());
        assert!("approve_12abc".parse::<CallbackAction>().is_err());
        assert!("approve_99999999999999999999".parse::<CallbackAction>().is_err());
    }

    #[test]
    fn test_parse_applicant_actions() {
        assert_eq!(
            "company_3".parse::<CallbackAction>(),
            Ok(ApplicantAction::Company(3).into())
        );
        assert_eq!(
            "edit_email".parse::<CallbackAction>(),
            Ok(ApplicantAction::Edit(Field::Email).into())
        );
        assert_eq!(
            "edit_verification".parse::<CallbackAction>(),
            Ok(ApplicantAction::EditVerification.into())
        );
        assert_eq!(
            "resubmit_profile".parse::<CallbackAction>(),
            Ok(ApplicantAction::Resubmit.into())
        );
        assert!("edit_salary".parse::<CallbackAction>().is_err());
        assert!("company_".parse::<CallbackAction>().is_err());
        assert!("".parse::<CallbackAction>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        let actions: Vec<CallbackAction> = vec![
            ApplicantAction::Company(11).into(),
            ApplicantAction::VerifyMember.into(),
            ApplicantAction::Edit(Field::Motivation).into(),
            ApplicantAction::ViewProfile.into(),
            CallbackAction::Review {
                decision: Decision::Reject,
                applicant: ChatId(987654321),
            },
        ];
        for action in actions {
            let data = action.to_string();
            assert!(data.len() <= botkit::keyboard::CALLBACK_DATA_LIMIT);
            assert_eq!(data.parse::<CallbackAction>(), Ok(action));
        }
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(Decision::Approve.to_string(), "approved");
        assert_eq!(Decision::Reject.to_string(), "rejected");
    }
}
