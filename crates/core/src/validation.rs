//! Field-level validation errors.
//!
//! Input DTOs declare their constraints with `validator` derives; this module
//! flattens the resulting [`ValidationErrors`] into a plain
//! field -> messages map that serializes predictably and can be extended with
//! checks that need the database (e.g. "category exists").

use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::{ValidationError, ValidationErrors};

/// Field name -> human-readable messages, sorted by field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Flatten `validator` errors into [`FieldErrors`].
///
/// Errors without a custom message fall back to their code (e.g. `length`).
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        let messages = out.entry(field.to_string()).or_default();
        for err in errs.iter() {
            messages.push(describe(err));
        }
    }
    out
}

/// Record one more message against `field`.
pub fn push_field_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

/// `validator` custom rule: reject strings that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

fn describe(err: &ValidationError) -> String {
    match &err.message {
        Some(message) => message.to_string(),
        None => err.code.to_string(),
    }
}
