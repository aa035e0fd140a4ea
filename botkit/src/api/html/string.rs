use std::{fmt, ops::Add};

use teloxide::{
    Bot,
    payloads::{EditMessageTextSetters, SendMessage, SendMessageSetters},
    prelude::Requester,
    requests::JsonRequest,
    types::{MessageId, ParseMode, Recipient},
};

/// Maximum length of a text message accepted by Telegram
pub const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

const TRUNCATION_MARKER: &str = "\n…";
const ELLIPSIS: &str = "…";

/// A wrapper around String that is safe to send with `ParseMode::Html`.
///
/// This struct can only be constructed through safe methods:
/// 1. `html!` macro - validates the format string at compile time and escapes arguments
/// 2. `escape` constructor - escapes `<`, `>` and `&` in the input
/// 3. `new` constructor - creates an empty HtmlString
/// 4. `From`/`Into` trait - automatically escapes the input
///
/// User supplied text (names, motivation letters, links) must never reach Telegram
/// unescaped, otherwise a stray `<` makes the Bot API reject the whole message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlString(String);

impl HtmlString {
    /// Creates an HtmlString by escaping all HTML special characters in the input.
    ///
    /// # Example
    /// ```rust
    /// use botkit::html::HtmlString;
    ///
    /// let html = HtmlString::escape("R&D <team>");
    /// assert_eq!(html.as_str(), "R&amp;D &lt;team&gt;");
    /// ```
    pub fn escape<T: Into<String>>(input: T) -> Self {
        let input_string = input.into();
        HtmlString(teloxide::utils::html::escape(&input_string))
    }

    /// Creates an empty HtmlString.
    pub fn new() -> Self {
        HtmlString(String::new())
    }

    /// Constructor for use by the `html!` macro after compile-time validation.
    /// This should only be called by trusted code that has already validated the input.
    #[doc(hidden)]
    pub fn from_validated_string(s: impl Into<String>) -> Self {
        HtmlString(s.into())
    }

    /// Returns the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the HtmlString and returns the inner String
    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Escapes `input` and shortens it so the escaped text is at most `max_chars`
    /// characters long. Entities are never split and a shortened text ends with "…".
    pub fn escape_truncated(input: &str, max_chars: usize) -> HtmlString {
        let escaped = HtmlString::escape(input);
        if escaped.0.chars().count() <= max_chars {
            return escaped;
        }
        if max_chars == 0 {
            return HtmlString::new();
        }
        let budget = max_chars - ELLIPSIS.chars().count();
        let mut buf = [0u8; 4];
        let mut used = 0;
        let mut cut = 0;
        for (pos, c) in input.char_indices() {
            let width = teloxide::utils::html::escape(c.encode_utf8(&mut buf))
                .chars()
                .count();
            if used + width > budget {
                break;
            }
            used += width;
            cut = pos + c.len_utf8();
        }
        HtmlString(teloxide::utils::html::escape(&input[..cut]) + ELLIPSIS)
    }

    /// Joins several HtmlStrings with a validated separator.
    pub fn join(parts: impl IntoIterator<Item = HtmlString>, separator: &HtmlString) -> HtmlString {
        let joined: Vec<String> = parts.into_iter().map(HtmlString::into_string).collect();
        HtmlString(joined.join(separator.as_str()))
    }

    /// Cuts the text to Telegram's message length limit, preferring a line boundary,
    /// and marks the cut with an ellipsis.
    pub fn truncated(self) -> HtmlString {
        if self.0.chars().count() <= TELEGRAM_MAX_MESSAGE_LENGTH {
            return self;
        }
        let budget = TELEGRAM_MAX_MESSAGE_LENGTH - TRUNCATION_MARKER.chars().count();
        let head: String = self.0.chars().take(budget).collect();
        let head = match head.rfind('\n') {
            Some(pos) if pos > 0 => head[..pos].to_string(),
            _ => head,
        };
        HtmlString(head + TRUNCATION_MARKER)
    }
}

impl fmt::Display for HtmlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for HtmlString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<HtmlString> for String {
    fn from(html: HtmlString) -> String {
        html.0
    }
}

impl From<&HtmlString> for HtmlString {
    fn from(html: &HtmlString) -> Self {
        html.clone()
    }
}

impl From<String> for HtmlString {
    fn from(s: String) -> Self {
        HtmlString::escape(s)
    }
}

impl From<&String> for HtmlString {
    fn from(s: &String) -> Self {
        HtmlString::escape(s.as_str())
    }
}

impl From<&str> for HtmlString {
    fn from(s: &str) -> Self {
        HtmlString::escape(s)
    }
}

macro_rules! impl_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for HtmlString {
                fn from(value: $ty) -> Self {
                    HtmlString::escape(value.to_string())
                }
            }
        )*
    };
}

impl_from_display!(i32, i64, u32, u64, usize);

impl Add for HtmlString {
    type Output = HtmlString;

    fn add(self, other: HtmlString) -> HtmlString {
        HtmlString(self.0 + &other.0)
    }
}

impl Add<&HtmlString> for HtmlString {
    type Output = HtmlString;

    fn add(self, other: &HtmlString) -> HtmlString {
        HtmlString(self.0 + &other.0)
    }
}

/// Trait for sending HtmlString messages with Bot
///
/// The methods mirror `send_message` / `edit_message_text`, set `ParseMode::Html`
/// and truncate texts longer than Telegram's limit, so a long motivation letter
/// never makes a request fail.
pub trait HtmlStringMessage: Requester {
    fn send_html_message<C>(&self, chat_id: C, text: HtmlString) -> JsonRequest<SendMessage>
    where
        C: Into<Recipient>;

    fn edit_html_message_text<C>(
        &self,
        chat_id: C,
        message_id: MessageId,
        text: HtmlString,
    ) -> <Self as Requester>::EditMessageText
    where
        C: Into<Recipient>;
}

impl HtmlStringMessage for Bot {
    fn send_html_message<C>(&self, chat_id: C, text: HtmlString) -> JsonRequest<SendMessage>
    where
        C: Into<Recipient>,
    {
        self.send_message(chat_id, text.truncated())
            .parse_mode(ParseMode::Html)
    }

    fn edit_html_message_text<C>(
        &self,
        chat_id: C,
        message_id: MessageId,
        text: HtmlString,
    ) -> <Self as Requester>::EditMessageText
    where
        C: Into<Recipient>,
    {
        self.edit_message_text(chat_id, message_id, text.truncated())
            .parse_mode(ParseMode::Html)
    }
}
