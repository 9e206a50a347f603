//! Error types for song markup parsing
//!
//! Every error here is fatal to the single song being parsed: malformed
//! markup or a broken parser invariant. Nothing is recovered mid-parse.

use thiserror::Error;

/// Top-level parse error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// XML is not well-formed
    #[error("Invalid XML at byte {position}: {message}")]
    Xml { position: usize, message: String },

    /// Element coordinates could not be resolved
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// A layer tag could not be built or is unbalanced
    #[error(transparent)]
    Layer(#[from] LayerError),

    /// Second text assignment on the same chunk
    #[error("Chunk text already set to {existing:?}, cannot assign {received:?}")]
    ChunkTextReassigned { existing: String, received: String },

    /// A span layer was still open when its part ended
    #[error("Span <{tag}> with id '{chunk_id}' is never closed inside its part")]
    UnclosedSpan { tag: String, chunk_id: String },

    /// Required structural attribute missing from a non-layer element
    #[error("Missing required attribute '{attribute}' on <{tag}>")]
    MissingAttribute { tag: String, attribute: String },

    /// Structural attribute present but unparsable
    #[error("Invalid value '{value}' for attribute '{attribute}' on <{tag}>")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        value: String,
    },

    /// Document contains no element of the expected kind
    #[error("Missing required element <{0}>")]
    MissingElement(String),
}

/// Extractor coordinate failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("{coordinate} must be positive, got {value}")]
    NonPositive { coordinate: &'static str, value: usize },

    #[error("Start line {start} is after end line {end}")]
    InvertedLines { start: usize, end: usize },

    #[error("Text has {available} lines, end line is {end}")]
    NotEnoughLines { available: usize, end: usize },

    #[error("No '<' found on line {line} before column {column}")]
    OpeningBracketNotFound { line: usize, column: usize },
}

/// Layer construction and balance failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    #[error("Unknown layer tag <{0}>")]
    UnknownTag(String),

    #[error("Missing required attribute '{attribute}' on <{tag}>")]
    MissingAttribute { tag: String, attribute: String },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <{tag}>")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        value: String,
    },

    #[error("Span <{tag}> with id '{chunk_id}' opened twice without closing")]
    AlreadyOpen { tag: String, chunk_id: String },

    #[error("Span <{tag}> with id '{chunk_id}' closed without being opened")]
    NotOpen { tag: String, chunk_id: String },
}

pub type Result<T> = std::result::Result<T, ParseError>;

impl ParseError {
    pub(crate) fn xml(position: usize, err: impl std::fmt::Display) -> Self {
        ParseError::Xml {
            position,
            message: err.to_string(),
        }
    }
}
