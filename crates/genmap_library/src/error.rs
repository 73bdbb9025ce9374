//! Errors raised while loading a UCF or building the catalog.

use genmap_expr::ExprError;
use std::path::PathBuf;

/// Errors produced by UCF loading and catalog construction.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// A UCF file could not be read.
    #[error("failed to read UCF '{}': {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A UCF file is not valid JSON.
    #[error("failed to parse UCF '{}': {source}", path.display())]
    Json {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A UCF document is not an array of collection records.
    #[error("UCF {0} document must be an array of records")]
    NotAnArray(String),

    /// A record does not have the shape its collection requires.
    #[error("malformed {collection} record '{name}': {message}")]
    Record {
        /// The collection the record belongs to.
        collection: String,
        /// The record name, or `?` when absent.
        name: String,
        /// What is wrong with it.
        message: String,
    },

    /// A part names a model that does not exist.
    #[error("part '{part}' references unknown model '{model}'")]
    MissingModel {
        /// The part name.
        part: String,
        /// The model name looked up.
        model: String,
    },

    /// A model lacks a function it needs, or names an unknown function.
    #[error("model '{model}' has no usable {role} function")]
    MissingFunction {
        /// The model name.
        model: String,
        /// The function role (`response_function`, `input_composition`, ...).
        role: String,
    },

    /// An equation failed to parse or bind.
    #[error("function '{function}': {source}")]
    Equation {
        /// The function name.
        function: String,
        /// The underlying equation error.
        #[source]
        source: ExprError,
    },
}
