//! Field-level validation shared by every write path.
//!
//! Validation collects every problem with a payload before failing, so a
//! client learns about all offending fields in one round trip.

use std::borrow::Cow;

use serde::Serialize;
use thiserror::Error;

/// A single offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire name of the field (camelCase), or a JSON path for nested values.
    pub field: Cow<'static, str>,
    /// Human-readable description of the problem.
    pub message: String,
}

/// Every field that failed validation for one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("invalid fields: {}", joined_names(.errors))]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Create an empty error list.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record a problem with `field`.
    pub fn add(&mut self, field: impl Into<Cow<'static, str>>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Returns `true` if no problems were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` if `field` has at least one problem.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// The recorded problems, in the order they were found.
    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.errors
    }

    /// Names of the offending fields, without duplicates.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        unique_names(&self.errors)
    }

    /// Succeed with `value` if nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` if any problem was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    /// Like [`finish`](Self::finish) for validators that return `None` after
    /// recording a problem.
    ///
    /// # Errors
    ///
    /// Returns `self` if any problem was recorded or `value` is `None`.
    pub fn complete<T>(self, value: Option<T>) -> Result<T, Self> {
        match value {
            Some(value) if self.is_empty() => Ok(value),
            _ => Err(self),
        }
    }
}

fn unique_names(errors: &[FieldError]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::with_capacity(errors.len());
    for error in errors {
        if !names.contains(&error.field.as_ref()) {
            names.push(&error.field);
        }
    }
    names
}

fn joined_names(errors: &[FieldError]) -> String {
    unique_names(errors).join(", ")
}

/// Validate a present text value: trimmed, non-blank, at most `max` chars.
///
/// Returns the trimmed value, or `None` after recording the problem.
pub fn text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max: usize,
) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "must not be blank");
        return None;
    }
    if trimmed.chars().count() > max {
        errors.add(field, format!("must be at most {max} characters"));
        return None;
    }
    Some(trimmed.to_owned())
}

/// Validate a required text value; a missing value is recorded as an error.
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    match value {
        Some(v) => text(errors, field, v, max),
        None => {
            errors.add(field, "is required");
            None
        }
    }
}

/// Validate a list of non-blank strings (image references).
pub fn text_list(
    errors: &mut ValidationErrors,
    field: &'static str,
    values: &[String],
    max: usize,
) -> Option<Vec<String>> {
    let mut out = Vec::with_capacity(values.len());
    let mut ok = true;
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().count() > max {
            ok = false;
        } else {
            out.push(trimmed.to_owned());
        }
    }
    if ok {
        Some(out)
    } else {
        errors.add(
            field,
            format!("entries must be non-blank and at most {max} characters"),
        );
        None
    }
}
