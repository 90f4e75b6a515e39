//! # Cleanup Pipeline
//!
//! Turns raw wikitext into plain prose for language-model training corpora.
//!
//! ## Pipeline Stages
//!
//! 0. **Preparation** - Unicode NFC, control characters, HTML comments, trailing sections
//! 1. **Structure** - templates `{{ }}`, then tables `{| |}`
//! 2. **Entities** - first character reference decoding pass
//! 3. **Links** - internal links resolved, external links and bare URLs dropped
//! 4. **Tags** - discard, self-closing and ignored tag classes, then any leftover tag
//! 5. **Markup** - emphasis, second decoding pass, variants, citations, captions, formulas
//! 6. **Line Filter** - headings, captions, short lines, low-CJK lines, list items
//! 7. **Document Gate** - punctuation cleanup and the accept/reject decision
//!
//! Stage order matters: links must be resolved before generic tag stripping,
//! and the two decoding passes must stay separate calls.

mod entity;
mod gate;
mod lines;
mod links;
mod markup;
mod nested;
mod prepare;
mod tags;

pub use entity::unescape;
pub use gate::{assess, finalize, MIN_DOC_CHARS, MIN_DOC_CJK_CHARS, MIN_DOC_CJK_RATIO};
pub use lines::{classify_line, filter_lines, LineVerdict};
pub use links::{resolve_external_links, resolve_internal_links, resolve_links};
pub use markup::{
    normalize_markup, strip_citations, strip_emphasis, strip_formulas, strip_image_keywords,
    strip_variants,
};
pub use nested::strip_nested;
pub use prepare::{normalize_unicode, strip_comments, truncate_trailing_sections};
pub use tags::strip_tags;

use crate::model::CleaningResult;

/// Per-call switches for the stages that sit around the core chain.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// NFC normalization and control character removal before anything else
    pub normalize_unicode: bool,
    /// Remove `<!-- ... -->` comments before structural stripping
    pub strip_comments: bool,
    /// Cut the article at the first reference / see-also style heading
    pub truncate_trailing_sections: bool,
    /// Extra passes used to make accepted output a fixpoint (0 = single pass)
    pub settle_passes: usize,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            strip_comments: true,
            truncate_trailing_sections: true,
            settle_passes: 2,
        }
    }
}

impl CleanOptions {
    /// Creates options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the core chain, single pass.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: false,
            strip_comments: false,
            truncate_trailing_sections: false,
            settle_passes: 0,
        }
    }

    /// Keeps sections such as references and external links.
    pub fn without_truncation(mut self) -> Self {
        self.truncate_trailing_sections = false;
        self
    }

    /// Sets the number of settling passes.
    pub fn with_settle_passes(mut self, passes: usize) -> Self {
        self.settle_passes = passes;
        self
    }
}

/// Returns true for characters in the CJK Unified Ideographs block.
#[inline]
pub fn is_cjk(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Counts CJK Unified Ideographs in `text`.
pub fn cjk_count(text: &str) -> usize {
    text.chars().filter(|&c| is_cjk(c)).count()
}

/// Runs the whole chain once.
///
/// [`clean_document`] is usually what you want; this skips settling.
pub fn run_pipeline(raw: &str, options: &CleanOptions) -> CleaningResult {
    let mut text = if options.normalize_unicode {
        normalize_unicode(raw)
    } else {
        raw.to_string()
    };

    if options.strip_comments {
        text = strip_comments(&text);
    }
    if options.truncate_trailing_sections {
        text = truncate_trailing_sections(&text);
    }

    // Stage 1: templates, then tables
    text = strip_nested(&text, "{{", "}}");
    text = strip_nested(&text, "{|", "|}");

    // Stage 2: first decoding pass
    text = unescape(&text);

    // Stages 3-5: links before tags, tags before markup
    text = resolve_links(&text);
    text = strip_tags(&text);
    text = normalize_markup(&text);

    // Stages 6-7
    text = filter_lines(&text);
    assess(&finalize(&text))
}

/// Cleans one raw document.
///
/// An accepted text is run through the chain again until it no longer
/// changes, so cleaning accepted output is always a no-op. A text that has
/// not settled after `settle_passes` extra passes is rejected.
///
/// # Example
///
/// ```
/// use wikiclean::cleanup::{clean_document, CleanOptions};
///
/// let result = clean_document("{{Infobox}}\n短", &CleanOptions::default());
/// assert!(!result.is_accepted());
/// ```
pub fn clean_document(raw: &str, options: &CleanOptions) -> CleaningResult {
    let mut result = run_pipeline(raw, options);
    if options.settle_passes == 0 {
        return result;
    }

    for _ in 0..options.settle_passes {
        let CleaningResult::Accepted { text, .. } = &result else {
            return result;
        };
        let again = run_pipeline(text, options);
        if again.text() == text.as_str() {
            return result;
        }
        tracing::trace!("cleaned text changed on re-entry, settling again");
        result = again;
    }

    CleaningResult::Rejected
}
