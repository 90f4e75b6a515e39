//! Documents going into the cleaner and records coming out of it.

use serde::{Deserialize, Serialize};

/// A candidate article as produced by the dump reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Page title
    pub title: String,
    /// Page id (never a revision id)
    pub id: u64,
    /// Raw wikitext of the latest revision
    pub text: String,
}

impl Document {
    /// Creates a document from its parts.
    pub fn new(title: impl Into<String>, id: u64, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id,
            text: text.into(),
        }
    }
}

/// Outcome of cleaning one document.
#[derive(Debug, Clone, PartialEq)]
pub enum CleaningResult {
    /// The cleaned text passed every quality threshold.
    Accepted {
        text: String,
        /// Character count of `text`
        length: usize,
        /// Share of CJK Unified Ideographs in `text`
        cjk_ratio: f64,
    },
    /// The document was filtered out.
    Rejected,
}

impl CleaningResult {
    /// Returns true if the document was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, CleaningResult::Accepted { .. })
    }

    /// Returns the cleaned text, or an empty string when rejected.
    pub fn text(&self) -> &str {
        match self {
            CleaningResult::Accepted { text, .. } => text,
            CleaningResult::Rejected => "",
        }
    }

    /// Consumes the result and returns the cleaned text (empty when rejected).
    pub fn into_text(self) -> String {
        match self {
            CleaningResult::Accepted { text, .. } => text,
            CleaningResult::Rejected => String::new(),
        }
    }
}

/// One line of the output corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub text: String,
    pub meta: RecordMeta,
}

/// Per-record metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub title: String,
    pub id: u64,
    pub length: usize,
    /// CJK share rounded to 3 decimals
    pub chinese_ratio: f64,
}

impl Record {
    /// Builds a record for an accepted document. Returns `None` when rejected.
    pub fn new(document: &Document, result: &CleaningResult) -> Option<Self> {
        match result {
            CleaningResult::Accepted {
                text,
                length,
                cjk_ratio,
            } => Some(Self {
                text: text.clone(),
                meta: RecordMeta {
                    title: document.title.clone(),
                    id: document.id,
                    length: *length,
                    chinese_ratio: round3(*cjk_ratio),
                },
            }),
            CleaningResult::Rejected => None,
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
