//! Inline markup normalization: emphasis, variants, citations, captions, formulas.

use super::entity::unescape;
use crate::config::CleanConfig;
use regex::Regex;
use std::sync::LazyLock;

static RE_BOLD_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'''''([^']*?)'''''").unwrap());

static RE_BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'''(.*?)'''").unwrap());

static RE_ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"''([^']*)''").unwrap());

/// `-zh-hans:...-` style variant labels
static RE_VARIANT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-zh-[^:]*:[^-]*-").unwrap());

/// `-{...}-` conversion blocks
static RE_VARIANT_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-\{[^}]*\}-").unwrap());

static RE_CITATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").unwrap());

static RE_ISBN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"ISBN\s*[\d\-X]+").unwrap());

static RE_DOI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"DOI\s*:?\s*[\d./]+").unwrap());

static RE_REPRINT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}\s*reprint\.?").unwrap());

static RE_IMAGE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    let words: Vec<String> = CleanConfig::global()
        .image_keywords
        .iter()
        .map(|word| regex::escape(word))
        .collect();
    Regex::new(&format!(r"(?i)\b(?:{}|\d+px)\b", words.join("|"))).unwrap()
});

/// `(x = y)`
static RE_PAREN_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*=[^)]*\)").unwrap());

/// `a=b`, each side at most 20 characters
static RE_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[\w\-+*/^]{1,20}\s*=\s*[\w\-+*/^]{1,20}\b").unwrap()
});

/// Runs every markup pass in order.
///
/// The second character reference decoding pass happens here, after
/// emphasis removal. The first one ran right after structural stripping.
pub fn normalize_markup(text: &str) -> String {
    let text = strip_emphasis(text);
    let text = unescape(&text);
    let text = strip_variants(&text);
    let text = strip_citations(&text);
    let text = strip_image_keywords(&text);
    strip_formulas(&text)
}

/// Bold-italic, bold, then italic markers are dropped, text is kept.
pub fn strip_emphasis(text: &str) -> String {
    let text = RE_BOLD_ITALIC.replace_all(text, "$1");
    let text = RE_BOLD.replace_all(&text, "$1");
    RE_ITALIC.replace_all(&text, "$1").into_owned()
}

/// Removes language variant annotations.
pub fn strip_variants(text: &str) -> String {
    let text = RE_VARIANT_LABEL.replace_all(text, "");
    RE_VARIANT_BLOCK.replace_all(&text, "").into_owned()
}

/// Removes `[n]` citation markers, ISBN and DOI tokens and reprint year stamps.
pub fn strip_citations(text: &str) -> String {
    let text = RE_CITATION.replace_all(text, "");
    let text = RE_ISBN.replace_all(&text, "");
    let text = RE_DOI.replace_all(&text, "");
    RE_REPRINT.replace_all(&text, "").into_owned()
}

/// Removes image placement and caption keywords as whole words.
pub fn strip_image_keywords(text: &str) -> String {
    RE_IMAGE_KEYWORDS.replace_all(text, "").into_owned()
}

/// Removes parenthesized assignments and short `token=token` fragments.
pub fn strip_formulas(text: &str) -> String {
    let text = RE_PAREN_ASSIGNMENT.replace_all(text, "");
    RE_ASSIGNMENT.replace_all(&text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_levels() {
        assert_eq!(strip_emphasis("'''''粗斜体'''''"), "粗斜体");
        assert_eq!(strip_emphasis("'''北京'''是首都"), "北京是首都");
        assert_eq!(strip_emphasis("''斜体''文字"), "斜体文字");
    }

    #[test]
    fn test_emphasis_unbalanced_left_alone() {
        assert_eq!(strip_emphasis("孤立的''标记"), "孤立的''标记");
    }

    #[test]
    fn test_second_decoding_pass() {
        assert_eq!(normalize_markup("甲&amp;乙"), "甲&乙");
    }

    #[test]
    fn test_variant_annotations() {
        assert_eq!(strip_variants("词语-zh-cn:计算机-结束"), "词语结束");
        assert_eq!(strip_variants("前-{zh-hans:计算机;zh-hant:電腦}-后"), "前后");
    }

    #[test]
    fn test_citations_and_identifiers() {
        assert_eq!(strip_citations("首都[1]，人口[23]"), "首都，人口");
        assert_eq!(strip_citations("见ISBN 978-7-02-008-X一书"), "见一书");
        assert_eq!(strip_citations("DOI: 10.1000/182 文章"), " 文章");
        assert_eq!(strip_citations("出版于1998 reprint."), "出版于");
    }

    #[test]
    fn test_image_keywords_whole_words() {
        assert_eq!(strip_image_keywords("thumb|250px|right|天安门"), "|||天安门");
        assert_eq!(strip_image_keywords("Thumbnail Frame"), " ");
        assert_eq!(strip_image_keywords("左|右"), "|");
    }

    #[test]
    fn test_image_keywords_inside_words_kept() {
        assert_eq!(strip_image_keywords("leftover copyright"), "leftover copyright");
        assert_eq!(strip_image_keywords("左右为难"), "左右为难");
    }

    #[test]
    fn test_formulas() {
        assert_eq!(strip_formulas("能量(E = mc^2)守恒"), "能量守恒");
        assert_eq!(strip_formulas("其中 x=y+1 成立"), "其中  成立");
    }

    #[test]
    fn test_formula_length_bounded() {
        let long = "a".repeat(30);
        let text = format!("{long}=b");
        // The left side can only take the last 20 characters, which do not start at a word boundary.
        assert_eq!(strip_formulas(&text), text);
    }
}
