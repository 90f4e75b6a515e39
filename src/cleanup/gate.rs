//! Document-level normalization and the accept/reject decision.

use super::cjk_count;
use crate::model::CleaningResult;
use regex::Regex;
use std::sync::LazyLock;

/// Minimum length of an accepted document, in characters.
pub const MIN_DOC_CHARS: usize = 100;

/// Minimum share of CJK characters in an accepted document.
pub const MIN_DOC_CJK_RATIO: f64 = 0.5;

/// Minimum absolute number of CJK characters in an accepted document.
pub const MIN_DOC_CJK_CHARS: usize = 50;

static RE_STRUCTURAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[|{}()（）\[\]<>]").unwrap());

static RE_SPACE_AROUND_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([，。！？；：])\s*").unwrap());

static RE_REPEATED_STOPS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[，。]{2,}").unwrap());

static RE_AFTER_SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([。！？])(\S)").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_LEADING_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s。，！？；：]+").unwrap());

/// Final punctuation and whitespace normalization.
///
/// Structural leftovers go first so that removing them cannot leave a
/// spacing or punctuation run behind for a later pass to find.
pub fn finalize(text: &str) -> String {
    let text = RE_STRUCTURAL.replace_all(text, "");
    let text = RE_SPACE_AROUND_PUNCT.replace_all(&text, "$1");
    let text = RE_REPEATED_STOPS.replace_all(&text, "。");
    let text = RE_AFTER_SENTENCE_END.replace_all(&text, "$1 $2");
    let text = RE_WHITESPACE.replace_all(&text, " ");
    let text = RE_LEADING_PUNCT.replace(&text, "");
    text.trim().to_string()
}

/// Accepts `text` if it is long enough and dense enough in CJK characters.
pub fn assess(text: &str) -> CleaningResult {
    let length = text.chars().count();
    let cjk = cjk_count(text);

    if length < MIN_DOC_CHARS
        || (cjk as f64) < length as f64 * MIN_DOC_CJK_RATIO
        || cjk < MIN_DOC_CJK_CHARS
    {
        tracing::trace!(length, cjk, "document rejected");
        return CleaningResult::Rejected;
    }

    CleaningResult::Accepted {
        text: text.to_string(),
        length,
        cjk_ratio: cjk as f64 / length as f64,
    }
}
