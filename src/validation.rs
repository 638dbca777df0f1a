//! Input Validation
//!
//! Request DTOs implement `validator::Validate` with the checks below; this
//! module also flattens the resulting `ValidationErrors` into the
//! `{ field: message }` map that the account routes return with a 400.

use crate::error::AccountError;

use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

/// Field-keyed validation messages, one per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::default();
        errors.insert(field, message);
        errors
    }

    /// Keeps the first message recorded for a field
    pub fn insert(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::default();
        for (field, errs) in errors.field_errors() {
            if let Some(err) = errs.first() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                fields.insert(&field, &message);
            }
        }
        fields
    }
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Records `message` and returns false when `value` is blank
pub(crate) fn require(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    message: &'static str,
) -> bool {
    if value.trim().is_empty() {
        errors.add(field, error("required", message));
        return false;
    }
    true
}

/// Required, well-formed email address
pub(crate) fn require_email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if require(errors, field, value, "Email field is required") && !value.validate_email() {
        errors.add(field, error("email", "Email is invalid"));
    }
}

pub(crate) fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a request, mapping failures to a field-keyed 400
pub fn validate_input<T: Validate>(input: &T) -> Result<(), AccountError> {
    input
        .validate()
        .map_err(|e| AccountError::Validation(FieldErrors::from(e)))
}
