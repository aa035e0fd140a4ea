//! Compile-time checks for format strings sent with `ParseMode::Html`.
//!
//! Telegram rejects the whole message when it meets an unsupported tag or a bare
//! `<`, `>` or `&`, so the `html!` macro runs these checks in a `const` block.

const ALLOWED_TAGS: &[&str] = &[
    "b",
    "strong",
    "i",
    "em",
    "u",
    "ins",
    "s",
    "strike",
    "del",
    "a",
    "code",
    "pre",
    "blockquote",
    "tg-spoiler",
];

const ALLOWED_ENTITIES: &[&str] = &["lt;", "gt;", "amp;", "quot;"];

/// Validates that a format string only contains markup Telegram's HTML mode accepts.
///
/// Panics (at compile time when used in a `const` context) when the string contains
/// an unknown tag, an unterminated tag, a bare `>` or `&`, or a named `{name}`
/// placeholder, since named placeholders would bypass argument escaping.
pub const fn validate_html_format(format: &str) {
    let bytes = format.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => i = validate_tag(bytes, i + 1),
            b'>' => panic!("Bare '>' outside of a tag, use &gt;"),
            b'&' => i = validate_entity(bytes, i + 1),
            b'{' => i = validate_placeholder(bytes, i + 1),
            b'}' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'}' {
                    i += 2;
                } else {
                    panic!("Unmatched closing brace in format string");
                }
            }
            _ => i += 1,
        }
    }
}

const fn validate_tag(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    if i < bytes.len() && bytes[i] == b'/' {
        i += 1;
    }
    let name_start = i;
    while i < bytes.len() && bytes[i] != b' ' && bytes[i] != b'>' {
        if bytes[i] == b'<' {
            panic!("Unterminated tag in format string");
        }
        i += 1;
    }
    if !is_allowed_tag(bytes, name_start, i) {
        panic!("Tag is not supported by Telegram HTML parse mode");
    }
    while i < bytes.len() && bytes[i] != b'>' {
        if bytes[i] == b'<' {
            panic!("Unterminated tag in format string");
        }
        i += 1;
    }
    if i >= bytes.len() {
        panic!("Unterminated tag in format string");
    }
    i + 1
}

const fn validate_entity(bytes: &[u8], start: usize) -> usize {
    let mut k = 0;
    while k < ALLOWED_ENTITIES.len() {
        let entity = ALLOWED_ENTITIES[k].as_bytes();
        if matches_at(bytes, start, entity) {
            return start + entity.len();
        }
        k += 1;
    }
    panic!("Bare '&' in format string, use &amp;")
}

const fn validate_placeholder(bytes: &[u8], start: usize) -> usize {
    if start < bytes.len() && (bytes[start] == b'}' || bytes[start] == b'{') {
        return start + 1;
    }
    panic!("Only positional placeholders are allowed")
}

const fn is_allowed_tag(bytes: &[u8], start: usize, end: usize) -> bool {
    let mut k = 0;
    while k < ALLOWED_TAGS.len() {
        let tag = ALLOWED_TAGS[k].as_bytes();
        if tag.len() == end - start && matches_at(bytes, start, tag) {
            return true;
        }
        k += 1;
    }
    false
}

const fn matches_at(bytes: &[u8], start: usize, pattern: &[u8]) -> bool {
    if start + pattern.len() > bytes.len() {
        return false;
    }
    let mut j = 0;
    while j < pattern.len() {
        if bytes[start + j] != pattern[j] {
            return false;
        }
        j += 1;
    }
    true
}
