//! HTML-like tag removal.

use crate::config::CleanConfig;
use regex::Regex;
use std::sync::LazyLock;

/// Compiled patterns for the three configured tag classes.
struct TagPatterns {
    /// One pattern per discard tag, since the close tag must repeat the name
    discard: Vec<Regex>,
    self_closing: Regex,
    ignored: Regex,
}

impl TagPatterns {
    fn compile(config: &CleanConfig) -> Self {
        // An open tag ending in "/>" is self-closing and must not start a discard span
        let discard = config
            .discard_tags
            .iter()
            .map(|tag| {
                let tag = regex::escape(tag);
                Regex::new(&format!(
                    r"(?is)<\s*{tag}\b(?:[^>]*[^/>])?>.*?<\s*/\s*{tag}\s*>"
                ))
                .unwrap()
            })
            .collect();

        Self {
            discard,
            self_closing: Regex::new(&format!(
                r"(?i)<\s*(?:{})\b[^>]*/\s*>",
                alternation(&config.self_closing_tags)
            ))
            .unwrap(),
            ignored: Regex::new(&format!(
                r"(?i)<\s*/?\s*(?:{})\b[^>]*>",
                alternation(&config.ignored_tags)
            ))
            .unwrap(),
        }
    }
}

fn alternation(tags: &[&str]) -> String {
    tags.iter()
        .map(|tag| regex::escape(tag))
        .collect::<Vec<_>>()
        .join("|")
}

static PATTERNS: LazyLock<TagPatterns> =
    LazyLock::new(|| TagPatterns::compile(CleanConfig::global()));

static RE_ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Removes tags in four passes.
///
/// 1. Discard tags go with everything they enclose.
/// 2. Self-closing tags (`<br/>`, `<ref name="a"/>`) are removed.
/// 3. Ignored tags lose their markers, content stays.
/// 4. Any remaining `<...>` is removed, content stays.
pub fn strip_tags(text: &str) -> String {
    let patterns = &*PATTERNS;
    let mut result = text.to_string();

    for pattern in &patterns.discard {
        result = pattern.replace_all(&result, "").into_owned();
    }
    result = patterns.self_closing.replace_all(&result, "").into_owned();
    result = patterns.ignored.replace_all(&result, "").into_owned();
    RE_ANY_TAG.replace_all(&result, "").into_owned()
}
