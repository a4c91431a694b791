//! Error types for the txtract-core library.

use thiserror::Error;

/// Main error type for the txtract library.
///
/// Heuristic absence (no table found, no card number found) is never an
/// error: the parser reports those as empty/`None` results.
#[derive(Error, Debug)]
pub enum TxtractError {
    /// A date format spelling the configuration layer does not know.
    #[error("unknown date format: {0}")]
    UnknownDateFormat(String),

    /// Upstream document extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Errors raised by the document-to-text extraction step that runs before
/// this engine. A document that fails extraction never reaches the table
/// parser; the type is published here as part of the boundary contract.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document is corrupt or otherwise unreadable.
    #[error("document is corrupt or unreadable: {0}")]
    Unreadable(String),

    /// The document decoded but produced no text content.
    #[error("document contains no extractable text")]
    NoText,
}

/// Result type for the txtract library.
pub type Result<T> = std::result::Result<T, TxtractError>;
