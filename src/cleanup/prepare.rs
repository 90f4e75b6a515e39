//! Preparation stages that run before structural stripping.

use crate::config::CleanConfig;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static RE_TRAILING_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    let names: Vec<String> = CleanConfig::global()
        .trailing_sections
        .iter()
        .map(|name| regex::escape(name))
        .collect();
    Regex::new(&format!(
        r"(?m)^[ \t]*=+[ \t]*(?:{})[ \t]*=+[ \t]*$",
        names.join("|")
    ))
    .unwrap()
});

/// NFC normalization plus removal of invisible control characters.
///
/// Full-width punctuation is left alone; the later stages depend on it.
pub fn normalize_unicode(input: &str) -> String {
    input.nfc().filter(|&c| !is_control_char(c)).collect()
}

/// Check if character is a control character that should be removed
fn is_control_char(c: char) -> bool {
    matches!(
        c,
        '\0'        // Null
        | '\x0B'    // Vertical Tab
        | '\x0C'    // Form Feed
        | '\u{FEFF}' // BOM
        | '\u{FFFD}' // Replacement character
        | '\u{00AD}' // Soft hyphen
    )
}

/// Removes `<!-- ... -->` comments, including multi-line ones.
pub fn strip_comments(text: &str) -> String {
    RE_COMMENT.replace_all(text, "").into_owned()
}

/// Cuts the text at the first heading naming a reference-style section.
///
/// Only whole heading lines count (`== 参考文献 ==`), so prose that merely
/// mentions "参见" is kept.
pub fn truncate_trailing_sections(text: &str) -> String {
    match RE_TRAILING_SECTION.find(text) {
        Some(m) => text[..m.start()].to_string(),
        None => text.to_string(),
    }
}
