use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

/// Telegram rejects callback data longer than this many bytes
pub const CALLBACK_DATA_LIMIT: usize = 64;

/// Represents different types of inline keyboard buttons
#[derive(Debug, Clone, PartialEq)]
pub enum ButtonData {
    /// Callback button with label and callback data
    Callback(String, String),
    /// Link button with label and target URL
    Url(String, Url),
}

impl ButtonData {
    pub fn callback(label: impl Into<String>, data: impl ToString) -> Self {
        ButtonData::Callback(label.into(), data.to_string())
    }

    pub fn url(label: impl Into<String>, url: Url) -> Self {
        ButtonData::Url(label.into(), url)
    }
}

impl From<(String, String)> for ButtonData {
    fn from((label, data): (String, String)) -> Self {
        ButtonData::Callback(label, data)
    }
}

impl From<(&str, &str)> for ButtonData {
    fn from((label, data): (&str, &str)) -> Self {
        ButtonData::Callback(label.to_string(), data.to_string())
    }
}

impl From<ButtonData> for InlineKeyboardButton {
    fn from(button: ButtonData) -> Self {
        match button {
            ButtonData::Callback(label, data) => {
                debug_assert!(
                    data.len() <= CALLBACK_DATA_LIMIT,
                    "callback data `{}` exceeds {} bytes",
                    data,
                    CALLBACK_DATA_LIMIT
                );
                InlineKeyboardButton::callback(label, data)
            }
            ButtonData::Url(label, url) => InlineKeyboardButton::url(label, url),
        }
    }
}

/// Build an InlineKeyboardMarkup from rows of button data.
///
/// Empty rows are skipped, Telegram renders them as a broken keyboard.
pub fn inline_keyboard<R, B>(rows: impl IntoIterator<Item = R>) -> InlineKeyboardMarkup
where
    R: IntoIterator<Item = B>,
    B: Into<ButtonData>,
{
    let button_rows: Vec<Vec<InlineKeyboardButton>> = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|item| InlineKeyboardButton::from(item.into()))
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();
    InlineKeyboardMarkup::new(button_rows)
}
