/// Creates an HtmlString with compile-time validation of the format string.
///
/// Arguments are converted with `HtmlString::from`, so plain strings and numbers are
/// escaped while values that already are `HtmlString` are inserted as is.
///
/// ```rust
/// use botkit::html;
///
/// let name = "<script>";
/// let text = html!("Hello <b>{}</b>", name);
/// assert_eq!(text.as_str(), "Hello <b>&lt;script&gt;</b>");
/// ```
#[macro_export]
macro_rules! html {
    ($format_str:literal $(, $arg:expr)* $(,)?) => {{
        // Compile-time validation for Telegram HTML parse mode
        const _: () = $crate::html::validate_html_format($format_str);

        let formatted_message = format!($format_str $(, $crate::html::HtmlString::from($arg))*);

        $crate::html::HtmlString::from_validated_string(formatted_message)
    }};
}
