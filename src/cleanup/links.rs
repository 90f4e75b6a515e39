//! Internal and external link resolution.
//!
//! Runs before tag stripping: the generic `<...>` remover would otherwise
//! see link contents that still carry markup.

use crate::config::CleanConfig;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// `[[target|display]]suffix`
static RE_WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[]*?)(?:\|([^\[]*?))?\]\](\w*)").unwrap());

/// Anything still shaped like an internal link after resolution.
static RE_LEFTOVER_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[.*?\]\]").unwrap());

static RE_EXTERNAL_LABELED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[https?://[^\s\]]+\s+([^\]]+)\]").unwrap());

static RE_EXTERNAL_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[https?://[^\]]+\]").unwrap());

static RE_BARE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

/// Resolves internal links, then external links and bare URLs.
pub fn resolve_links(text: &str) -> String {
    let text = resolve_internal_links(text);
    resolve_external_links(&text)
}

/// Replaces `[[target|display]]suffix` with `display + suffix`.
///
/// Links whose target starts with an asset namespace (`File:`, `Category:`,
/// ...) are removed entirely. Links that do not fit the pattern are deleted.
///
/// # Example
///
/// ```
/// use wikiclean::cleanup::resolve_internal_links;
///
/// assert_eq!(resolve_internal_links("[[北京|首都]]市"), "首都市");
/// assert_eq!(resolve_internal_links("[[Category:Foo]]"), "");
/// ```
pub fn resolve_internal_links(text: &str) -> String {
    let config = CleanConfig::global();
    let resolved = RE_WIKILINK.replace_all(text, |caps: &Captures| {
        let target = caps.get(1).map_or("", |m| m.as_str());
        let display = caps.get(2).map_or(target, |m| m.as_str());
        let suffix = caps.get(3).map_or("", |m| m.as_str());

        if let Some(colon) = target.find(':') {
            if colon > 0 && config.is_asset_namespace(&target[..colon]) {
                return String::new();
            }
        }
        format!("{display}{suffix}")
    });
    RE_LEFTOVER_LINK.replace_all(&resolved, "").into_owned()
}

/// `[url label]` becomes `label`; `[url]` and bare URLs are removed.
pub fn resolve_external_links(text: &str) -> String {
    let text = RE_EXTERNAL_LABELED.replace_all(text, "$1");
    let text = RE_EXTERNAL_BARE.replace_all(&text, "");
    RE_BARE_URL.replace_all(&text, "").into_owned()
}
