//! Multipart/form input types and their validation into typed payloads.

use std::collections::BTreeMap;

pub mod products;

/// Mapping from form field name to the list of validation messages for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Record a validation message against a field.
pub fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}
