//! Identifier and label utilities.
//!
//! Registered entities carry stable string ids (UUIDs when the registry mints
//! them). Categories and relationship types are open labels: they are only
//! checked for non-emptiness, never against a closed vocabulary.

use crate::{Error, Result};

/// Generate a fresh entity id (UUID v4, hyphenated lowercase).
///
/// # Examples
///
/// ```
/// use rela_core::util::ids::generate_id;
///
/// let id = generate_id();
/// assert_eq!(id.len(), 36);
/// assert_ne!(id, generate_id());
/// ```
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Check that a node id is usable.
///
/// Ids are compared verbatim, so surrounding whitespace is not trimmed;
/// an id consisting only of whitespace is rejected.
///
/// # Examples
///
/// ```
/// use rela_core::util::ids::validate_id;
///
/// assert!(validate_id("payments-api").is_ok());
/// assert!(validate_id("").is_err());
/// assert!(validate_id("   ").is_err());
/// ```
pub fn validate_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::validation("node id must not be empty"));
    }
    Ok(())
}

/// Check that a free-form label (category, relationship type) is non-empty.
///
/// `what` names the field in the error message.
pub fn validate_label(what: &str, label: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(Error::validation(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Check that an edge weight is finite and non-negative.
pub fn validate_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(Error::validation(format!(
            "edge weight must be a non-negative finite number, got {weight}"
        )));
    }
    Ok(())
}
