//! Utility modules shared across Rela crates.
//!
//! # Modules
//!
//! - [`ids`]: Identifier generation and input validation

pub mod ids;
