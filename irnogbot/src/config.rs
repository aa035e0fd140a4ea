use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::Parser;
use serde::{Deserialize, Serialize};
use teloxide::types::{ChatId, Recipient};
use url::Url;

pub const PREDEFINED_BOT_TOKEN_RELEASE: Option<&str> = option_env!("PREDEFINED_BOT_TOKEN_RELEASE");
pub const PREDEFINED_BOT_TOKEN_DEBUG: Option<&str> = option_env!("PREDEFINED_BOT_TOKEN_DEBUG");
pub const PREDEFINED_BOT_TOKEN: Option<&str> = if cfg!(debug_assertions) {
    PREDEFINED_BOT_TOKEN_DEBUG
} else {
    PREDEFINED_BOT_TOKEN_RELEASE
};
pub const BOT_TOKEN_HELP: &str = if PREDEFINED_BOT_TOKEN_RELEASE.is_some() {
    "Environment variable name containing the bot token. If not set, uses precompiled token"
} else {
    "Environment variable name containing the bot token"
};

pub const DEFAULT_CHANNEL_LINK: &str = "https://t.me/irnog";

/// A Telegram bot that collects IRNOG membership applications
#[derive(Parser, Debug)]
#[command(name = "irnogbot")]
#[command(about = "A Telegram bot that collects membership applications", long_about = None)]
pub struct Args {
    #[arg(long, default_value = "BOT_TOKEN", help = BOT_TOKEN_HELP)]
    pub bot_token_env: String,

    /// Chat id of the reviewer who approves or rejects applications
    #[arg(long, env = "ADMIN_ID", allow_negative_numbers = true)]
    pub admin_id: i64,

    /// Channel applicants must join before registering (numeric id or @username)
    #[arg(long, env = "CHANNEL_ID", allow_negative_numbers = true)]
    pub channel_id: Option<ChannelTarget>,

    /// Link shown on the "join channel" button
    #[arg(long, env = "CHANNEL_LINK", default_value = DEFAULT_CHANNEL_LINK)]
    pub channel_link: Url,

    /// Invite link sent to approved applicants
    #[arg(long, env = "GROUP_LINK")]
    pub group_link: Url,

    /// JSON file with applicants and their conversation state
    #[arg(long, env = "USERS_FILE", default_value = "users.json")]
    pub users_file: PathBuf,

    /// Keep applicants in memory only (nothing is written to disk)
    #[arg(long)]
    pub in_memory: bool,

    /// YAML file with the company roster shown during registration
    #[arg(long, env = "COMPANIES_FILE")]
    pub companies: Option<PathBuf>,

    /// Text file receiving one line per forwarded application and reviewer decision
    #[arg(long, env = "AUDIT_LOG")]
    pub audit_log: Option<PathBuf>,

    /// Public URL of the webhook; long polling is used when not set
    #[arg(long, env = "WEBHOOK_URL")]
    pub webhook_url: Option<Url>,

    /// Local address the webhook server listens on
    #[arg(long, env = "WEBHOOK_ADDRESS", default_value = "0.0.0.0:8443")]
    pub webhook_address: SocketAddr,
}

impl Args {
    /// Get the bot token from the configured environment variable or predefined token
    pub fn get_token(&self) -> Result<String, String> {
        match std::env::var(&self.bot_token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => PREDEFINED_BOT_TOKEN.map(str::to_string).ok_or_else(|| {
                format!(
                    "Environment variable {} not found and no precompiled token available",
                    self.bot_token_env
                )
            }),
        }
    }
}

/// Channel reference accepted by `getChatMember`: a numeric id or a public @username
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTarget(pub Recipient);

impl FromStr for ChannelTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('@') && s.len() > 1 {
            return Ok(ChannelTarget(Recipient::ChannelUsername(s.to_string())));
        }
        s.parse::<i64>()
            .map(|id| ChannelTarget(Recipient::Id(ChatId(id))))
            .map_err(|_| format!("`{}` is neither a numeric chat id nor an @username", s))
    }
}

/// Companies offered as buttons, in display order, followed by the "other" entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRoster {
    pub companies: Vec<String>,
    #[serde(default = "default_other_label")]
    pub other: String,
}

/// Result of resolving a company button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyChoice<'a> {
    Named(&'a str),
    Other,
}

fn default_other_label() -> String {
    "Other".to_string()
}

impl Default for CompanyRoster {
    fn default() -> Self {
        Self {
            companies: [
                "ArvanCloud",
                "Irancell",
                "Pishgaman",
                "Hamravesh",
                "Snapp",
                "Chakavak",
                "Afranet",
                "Hamrah-e Aval",
                "Abrdarak",
                "Sotoon",
                "Telecommunication Company of Iran",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            other: default_other_label(),
        }
    }
}

impl CompanyRoster {
    /// Load the roster from a YAML file
    pub async fn load(path: &Path) -> Result<Self, String> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read company roster {:?}: {}", path, e))?;
        let roster: CompanyRoster = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse company roster {:?}: {}", path, e))?;
        if roster.companies.is_empty() {
            return Err(format!("Company roster {:?} is empty", path));
        }
        Ok(roster)
    }

    /// Labels of all buttons, the "other" entry last
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.companies
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.other.as_str()))
    }

    /// Resolve a button index; the index right after the last company is "other"
    pub fn choice(&self, index: usize) -> Option<CompanyChoice<'_>> {
        match index {
            i if i < self.companies.len() => Some(CompanyChoice::Named(&self.companies[i])),
            i if i == self.companies.len() => Some(CompanyChoice::Other),
            _ => None,
        }
    }
}

/// Runtime settings shared by all handlers
#[derive(Debug, Clone)]
pub struct Settings {
    pub bot_username: String,
    pub admin_id: ChatId,
    pub channel: Option<Recipient>,
    pub channel_link: Url,
    pub group_link: Url,
    pub companies: CompanyRoster,
}

impl Settings {
    pub fn new(args: &Args, bot_username: String, companies: CompanyRoster) -> Self {
        Self {
            bot_username,
            admin_id: ChatId(args.admin_id),
            channel: args.channel_id.clone().map(|channel| channel.0),
            channel_link: args.channel_link.clone(),
            group_link: args.group_link.clone(),
            companies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_target_parsing() {
        assert_eq!(
            "-1001234".parse::<ChannelTarget>(),
            Ok(ChannelTarget(Recipient::Id(ChatId(-1001234))))
        );
        assert_eq!(
            "@irnog".parse::<ChannelTarget>(),
            Ok(ChannelTarget(Recipient::ChannelUsername("@irnog".to_string())))
        );
        assert!("irnog".parse::<ChannelTarget>().is_err());
        assert!("@".parse::<ChannelTarget>().is_err());
    }

    #[test]
    fn test_default_roster_choices() {
        let roster = CompanyRoster::default();
        assert_eq!(roster.labels().count(), 12);
        assert_eq!(roster.choice(0), Some(CompanyChoice::Named("ArvanCloud")));
        assert_eq!(roster.choice(11), Some(CompanyChoice::Other));
        assert_eq!(roster.choice(12), None);
        assert_eq!(roster.labels().last(), Some("Other"));
    }

    #[test]
    fn test_roster_yaml_without_other_label() {
        let yaml = "companies:\n  - Acme\n  - Globex\n";
        let roster: CompanyRoster = serde_yaml::from_str(yaml).expect("Failed to parse roster");
        assert_eq!(roster.companies, vec!["Acme", "Globex"]);
        assert_eq!(roster.other, "Other");
    }

    #[test]
    fn test_cli_arguments() {
        let args = Args::try_parse_from([
            "irnogbot",
            "--admin-id",
            "42",
            "--channel-id",
            "-100500",
            "--group-link",
            "https://t.me/+secret",
            "--in-memory",
        ])
        .expect("Failed to parse arguments");

        assert_eq!(args.admin_id, 42);
        assert_eq!(args.bot_token_env, "BOT_TOKEN");
        assert!(args.in_memory);
        assert_eq!(args.users_file, PathBuf::from("users.json"));
        assert_eq!(args.channel_link.as_str(), "https://t.me/irnog");

        let settings = Settings::new(&args, "bot".to_string(), CompanyRoster::default());
        assert_eq!(settings.admin_id, ChatId(42));
        assert_eq!(settings.channel, Some(Recipient::Id(ChatId(-100500))));
    }
}
