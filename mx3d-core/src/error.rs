//! Error types for the loading boundary.
//!
//! The transform pipeline itself never fails. Only turning outside text
//! (compact model JSON, color strings, matrix literals) into core values can.

use thiserror::Error;

/// Errors raised while parsing textual input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Color string is not `#rrggbb`.
    #[error("invalid color '{0}', expected #rrggbb")]
    Color(String),

    /// Matrix literal is not three rows of three numbers.
    #[error("invalid matrix literal '{0}', expected 'a b c; d e f; g h i'")]
    Matrix(String),

    /// Unknown built-in model name.
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    /// Unknown operation name.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),
}

/// Errors raised while loading a compact model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Model file could not be read.
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    /// JSON did not match the compact `{ label, v, f }` layout.
    #[error("malformed model JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A face color failed to parse.
    #[error("face {face}: {source}")]
    InvalidColor {
        face: usize,
        #[source]
        source: ParseError,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the model has {count} vertices")]
    VertexIndexOutOfRange {
        face: usize,
        index: usize,
        count: usize,
    },

    /// Nothing left to draw.
    #[error("model has no faces")]
    Empty,
}

/// Result type for model loading.
pub type Result<T> = std::result::Result<T, ModelError>;
