//! # wikiclean
//!
//! A Rust library for turning MediaWiki dumps into plain Chinese prose for
//! language-model training corpora.
//!
//! ## Pipeline
//!
//! Each article goes through a fixed chain of text transformations (templates
//! and tables, character references, links, tags, inline markup, line
//! filtering) and ends with an accept/reject decision based on length and
//! CJK density. See [`cleanup`] for the stage list.
//!
//! ## Quick Start
//!
//! ```
//! let raw = "{{Infobox}}'''长江'''是[[亚洲]]第一长河。";
//! // Far too short to be accepted
//! assert_eq!(wikiclean::clean(raw), "");
//! ```
//!
//! Processing a whole dump:
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufWriter;
//! use wikiclean::{open_dump, process_dump, ProcessOptions, RecordWriter};
//!
//! fn main() -> wikiclean::Result<()> {
//!     let mut reader = open_dump("zhwiki-latest-pages-articles.xml.bz2")?;
//!     let mut writer = RecordWriter::new(BufWriter::new(File::create("out.jsonl")?));
//!
//!     let summary = process_dump(&mut reader, &mut writer, &ProcessOptions::default(), |_| {})?;
//!     println!("accepted {}", summary.corpus.accepted);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `bz2` (default): read `.bz2` compressed dumps

pub mod cleanup;
pub mod config;
pub mod dump;
pub mod error;
pub mod model;
pub mod output;
pub mod process;
pub mod stats;

// Re-exports
pub use cleanup::{clean_document, CleanOptions};
pub use config::CleanConfig;
pub use dump::{open_dump, DumpReader, DumpStats};
pub use error::{Error, Result};
pub use model::{CleaningResult, Document, Record, RecordMeta};
pub use output::RecordWriter;
pub use process::{clean_batch, process_dump, ProcessOptions, Progress};
pub use stats::{CorpusStats, ProcessSummary};

/// Cleans one raw wikitext document with default options.
///
/// Returns the cleaned text, or an empty string if the document was rejected.
///
/// # Example
///
/// ```
/// let sentence = "长江是亚洲第一长河，全长六千三百余公里，流经青海、西藏、四川等十一个省级行政区。";
/// let raw = format!("'''长江'''{{{{Infobox river}}}}{}", sentence.repeat(3));
///
/// let text = wikiclean::clean(&raw);
/// assert!(text.starts_with("长江长江是"));
/// assert_eq!(wikiclean::clean(&text), text);
/// ```
pub fn clean(raw: &str) -> String {
    clean_document(raw, &CleanOptions::default()).into_text()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_rejects_with_empty_string() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("* 列表\n== 标题 =="), "");
    }

    #[test]
    fn test_clean_matches_clean_document() {
        let raw = "北京是中华人民共和国的首都，也是全国的政治中心和文化中心，有着三千多年的建城历史。"
            .repeat(4);
        let result = clean_document(&raw, &CleanOptions::default());
        assert!(result.is_accepted());
        assert_eq!(clean(&raw), result.text());
    }

    #[test]
    fn test_process_options_builder() {
        let options = ProcessOptions::new()
            .with_batch_size(0)
            .with_max_articles(10)
            .with_sample_size(5)
            .sequential()
            .with_clean_options(CleanOptions::minimal());

        assert_eq!(options.batch_size, 1);
        assert_eq!(options.max_articles, Some(10));
        assert_eq!(options.sample_size, 5);
        assert!(!options.parallel);
        assert_eq!(options.clean.settle_passes, 0);
    }

    #[test]
    fn test_process_options_defaults() {
        let options = ProcessOptions::default();
        assert_eq!(options.batch_size, 256);
        assert_eq!(options.max_articles, None);
        assert_eq!(options.sample_size, 1000);
        assert!(options.parallel);
    }
}
