//! Field-level validation errors.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Path to the offending value, outermost segment first.
    pub location: Vec<String>,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    /// Creates an error located at a single top-level field.
    #[must_use]
    pub fn at(field: &str, message: impl Into<String>) -> Self {
        Self {
            location: vec![field.to_owned()],
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location.join("."), self.message)
    }
}

/// Every field error found in one input, reported together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", format_errors(.0))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Wraps a single field error.
    #[must_use]
    pub fn single(error: FieldError) -> Self {
        Self(vec![error])
    }

    /// Returns the collected errors, or `Ok(())` when there are none.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` when `errors` is non-empty.
    pub fn check(errors: Vec<FieldError>) -> Result<(), Self> {
        if errors.is_empty() {
            return Ok(());
        }
        Err(Self(errors))
    }

    /// Returns the individual field errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Returns `true` when any error is located at `field`.
    #[must_use]
    pub fn mentions(&self, field: &str) -> bool {
        self.0
            .iter()
            .any(|error| error.location.first().is_some_and(|segment| segment == field))
    }
}

fn format_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
