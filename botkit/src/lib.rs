//! Botkit - small helpers shared by our Telegram bots

// Private API modules
pub(crate) mod api;

// Public html module with re-exports
pub mod html {
    pub use crate::api::html::string::{HtmlString, HtmlStringMessage, TELEGRAM_MAX_MESSAGE_LENGTH};

    // Used by the `html!` macro
    #[doc(hidden)]
    pub use crate::api::html::validate::validate_html_format;
}

// Public keyboard module with re-exports
pub mod keyboard {
    pub use crate::api::keyboard::{ButtonData, CALLBACK_DATA_LIMIT, inline_keyboard};
}
