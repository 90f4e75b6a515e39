//! Error types for wikiclean library.

use std::io;
use thiserror::Error;

/// Result type alias for wikiclean operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wikiclean library.
///
/// The cleaning pipeline itself never fails; these errors come from the
/// surrounding dump reading and record writing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The dump is not well-formed XML. Reading cannot continue.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// A single page is missing required fields or carries unparsable ones.
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Returns true if the dump reader cannot make further progress after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::InvalidPage(_))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_page_is_recoverable() {
        assert!(!Error::InvalidPage("no id".into()).is_fatal());
        assert!(Error::XmlParse("eof".into()).is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidPage("page without title".into());
        assert_eq!(err.to_string(), "Invalid page: page without title");
    }
}
