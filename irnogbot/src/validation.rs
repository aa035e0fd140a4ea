use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@<>]+@[^\s@<>]+\.[^\s@<>.]{2,}$").expect("valid e-mail regex")
});

fn parse_web_url(text: &str) -> Option<Url> {
    let url = Url::parse(text.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url),
        _ => None,
    }
}

/// Absolute http(s) URL with a host
pub fn is_valid_url(text: &str) -> bool {
    parse_web_url(text).is_some()
}

/// Web URL pointing to linkedin.com or one of its subdomains
pub fn is_valid_linkedin_url(text: &str) -> bool {
    parse_web_url(text)
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| host == "linkedin.com" || host.ends_with(".linkedin.com"))
}

pub fn is_valid_email(text: &str) -> bool {
    EMAIL_RE.is_match(text.trim())
}
