//! Rela Core: shared error type, input validation, and id utilities.
//!
//! This crate provides the foundational types used across all Rela crates.
//! It has no internal Rela dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`util`]: Identifier generation and label validation

#![doc = include_str!("../README.md")]

pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};

// Convenience re-exports from util
pub use util::ids::{generate_id, validate_id, validate_label, validate_weight};
