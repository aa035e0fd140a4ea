use serde::{Deserialize, Serialize};

/// Review status of an application.
/// The Persian labels written by the first version of the bot are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[serde(alias = "در انتظار بررسی")]
    Pending,
    #[serde(alias = "تایید شده")]
    Approved,
    #[serde(alias = "رد شده")]
    Rejected,
}

impl ApplicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "⏳ Pending review",
            ApplicationStatus::Approved => "✅ Approved",
            ApplicationStatus::Rejected => "❌ Rejected",
        }
    }
}

/// How the applicant proves their professional identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Verification {
    Linkedin {
        value: String,
    },
    Resume {
        value: String,
    },
    Referral {
        /// Telegram id of the referring member
        value: String,
        #[serde(default)]
        ref_name: Option<String>,
    },
}

/// Data collected by the registration form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expertise: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
}

/// A single field change produced by the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationUpdate {
    Name(String),
    Company(String),
    Expertise(String),
    Email(String),
    Motivation(String),
    ReferralName(String),
    Verification(Verification),
    Status(ApplicationStatus),
}

impl Application {
    pub fn apply(&mut self, update: ApplicationUpdate) {
        match update {
            ApplicationUpdate::Name(name) => self.name = Some(name),
            ApplicationUpdate::Company(company) => self.company = Some(company),
            ApplicationUpdate::Expertise(expertise) => self.expertise = Some(expertise),
            ApplicationUpdate::Email(email) => self.email = Some(email),
            ApplicationUpdate::Motivation(motivation) => self.motivation = Some(motivation),
            ApplicationUpdate::ReferralName(name) => self.referral_name = Some(name),
            ApplicationUpdate::Verification(verification) => {
                self.verification = Some(verification)
            }
            ApplicationUpdate::Status(status) => self.status = Some(status),
        }
    }

    /// Status shown to users; an application that was never reviewed is pending
    pub fn status(&self) -> ApplicationStatus {
        self.status.unwrap_or(ApplicationStatus::Pending)
    }

    /// Every field the reviewer needs has been filled in
    pub fn is_complete(&self) -> bool {
        self.name.is_some()
            && self.company.is_some()
            && self.expertise.is_some()
            && self.email.is_some()
            && self.motivation.is_some()
            && self.verification.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Application::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_application() -> Application {
        Application {
            name: Some("Sara Karimi".to_string()),
            company: Some("Snapp".to_string()),
            expertise: Some("BGP".to_string()),
            email: Some("sara@snapp.ir".to_string()),
            motivation: Some("Peering".to_string()),
            referral_name: None,
            verification: Some(Verification::Linkedin {
                value: "https://www.linkedin.com/in/sara".to_string(),
            }),
            status: None,
        }
    }

    #[test]
    fn test_apply_updates() {
        let mut application = Application::default();
        assert!(application.is_empty());

        application.apply(ApplicationUpdate::Name("Ali".to_string()));
        application.apply(ApplicationUpdate::Status(ApplicationStatus::Approved));

        assert_eq!(application.name.as_deref(), Some("Ali"));
        assert_eq!(application.status(), ApplicationStatus::Approved);
        assert!(!application.is_empty());
        assert!(!application.is_complete());
    }

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(Application::default().status(), ApplicationStatus::Pending);
    }

    #[test]
    fn test_is_complete() {
        let mut application = complete_application();
        assert!(application.is_complete());

        application.verification = None;
        assert!(!application.is_complete());
    }

    #[test]
    fn test_json_layout() {
        let json = serde_json::to_value(complete_application()).expect("Failed to serialize");

        assert_eq!(json["name"], "Sara Karimi");
        assert_eq!(json["verification"]["type"], "linkedin");
        assert_eq!(json["verification"]["value"], "https://www.linkedin.com/in/sara");
        assert!(json.get("status").is_none());
        assert!(json.get("referral_name").is_none());
    }

    #[test]
    fn test_reads_legacy_records() {
        let json = r#"{
            "name": "Reza",
            "referral_name": "Maryam",
            "verification": {"type": "referral", "value": "@maryam", "ref_name": "Maryam"},
            "status": "تایید شده"
        }"#;
        let application: Application = serde_json::from_str(json).expect("Failed to parse");

        assert_eq!(application.status(), ApplicationStatus::Approved);
        assert_eq!(
            application.verification,
            Some(Verification::Referral {
                value: "@maryam".to_string(),
                ref_name: Some("Maryam".to_string()),
            })
        );
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ApplicationStatus::Rejected).expect("Failed to serialize");
        assert_eq!(json, "\"rejected\"");
    }
}
