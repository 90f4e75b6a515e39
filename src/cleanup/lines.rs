//! Line-level quality filter.

use super::cjk_count;
use regex::Regex;
use std::sync::LazyLock;

/// Lines shorter than this many characters are dropped.
pub const MIN_LINE_CHARS: usize = 15;

/// Minimum share of CJK characters in a kept line.
pub const MIN_LINE_CJK_RATIO: f64 = 0.3;

/// Caption heuristic only applies to lines shorter than this.
const CAPTION_MAX_CHARS: usize = 200;

/// Caption heuristic: more than this many enumeration commas.
const CAPTION_MAX_COMMAS: usize = 2;

const SENTENCE_ENDINGS: [char; 3] = ['。', '！', '？'];

const LIST_MARKERS: [char; 6] = ['*', '#', ':', ';', '•', '·'];

static RE_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^=+.*=+$").unwrap());

/// Why a line was kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineVerdict {
    Keep,
    Empty,
    Heading,
    Caption,
    TooShort,
    LowCjk,
    ListItem,
}

impl LineVerdict {
    /// Returns true if the line survives the filter.
    pub fn is_keep(self) -> bool {
        self == LineVerdict::Keep
    }
}

/// Classifies one physical line. Surrounding whitespace is ignored.
pub fn classify_line(line: &str) -> LineVerdict {
    let line = line.trim();
    if line.is_empty() {
        return LineVerdict::Empty;
    }

    if RE_HEADING.is_match(line) {
        return LineVerdict::Heading;
    }

    let len = line.chars().count();
    if looks_like_caption(line, len) {
        return LineVerdict::Caption;
    }

    if len < MIN_LINE_CHARS {
        return LineVerdict::TooShort;
    }

    if (cjk_count(line) as f64) < len as f64 * MIN_LINE_CJK_RATIO {
        return LineVerdict::LowCjk;
    }

    if line.starts_with(LIST_MARKERS) {
        return LineVerdict::ListItem;
    }

    LineVerdict::Keep
}

/// Image captions list things with commas and never finish a sentence.
fn looks_like_caption(line: &str, len: usize) -> bool {
    len < CAPTION_MAX_CHARS
        && line.matches('，').count() > CAPTION_MAX_COMMAS
        && !line.contains(SENTENCE_ENDINGS)
}

/// Keeps the lines that pass [`classify_line`], trimmed and joined with a space.
pub fn filter_lines(text: &str) -> String {
    text.split('\n')
        .filter(|line| classify_line(line).is_keep())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}
