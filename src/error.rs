//! Error types for vellum operations.

use thiserror::Error;

/// Errors that can occur while parsing HTML documents or Markdown text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The document contains none of h1 through h4, so there is no heading
    /// to anchor the section tree on.
    #[error("no heading found among h1-h4")]
    NoHeadingFound,

    /// A list item's leading spaces are not a multiple of the 4-space
    /// indent step.
    #[error("invalid list indentation ({spaces} leading spaces) in line: {line:?}")]
    InvalidIndentation { spaces: usize, line: String },

    /// A fused inline-style run did not match any recognized wrapper
    /// pattern (bold, italic, code, strikethrough, link).
    #[error("unrecognized styled span: {0:?}")]
    InvalidStyledSpan(String),
}

pub type Result<T> = std::result::Result<T, Error>;
