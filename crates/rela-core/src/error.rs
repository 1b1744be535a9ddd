//! Error types for Rela operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Rela crates. Uses `thiserror` for derive macros.
//!
//! Not-found is deliberately absent from the taxonomy: graph queries report
//! absence through empty results, never through `Err`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in Rela operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Malformed input to an operation (empty id, bad weight, depth too large).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A long-running query was stopped by its deadline or cancel token.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// A graph invariant was violated.
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O error without path context.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a specific file.
    #[error("I/O error on {path}: {source}")]
    IoWithPath {
        /// File the operation was working on.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Parse error (malformed snapshot or config content).
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a cancellation error.
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Create an internal invariant error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Wrap an I/O error with the path it occurred on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns `true` for caller mistakes that a service should reject (4xx).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if the operation was aborted by a deadline or token.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// Result type alias using Rela's Error type.
pub type Result<T> = std::result::Result<T, Error>;
