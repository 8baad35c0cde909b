//! Validation Support
//!
//! Create and Update shapes implement [`Validatable`]; handlers call
//! `validate()` before opening a unit of work so invalid input never reaches
//! storage. Errors are collected per field and surface as a 400 response.
//!
//! ```rust,ignore
//! impl Validatable for AuthorCreate {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         errors.check(validators::validate_not_blank("name", &self.name));
//!         errors.result()
//!     }
//! }
//! ```

use crate::errors::ApiError;
use std::fmt;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record the error of a failed check, if any
    pub fn check(&mut self, outcome: Result<(), ValidationError>) {
        if let Err(error) = outcome {
            self.add(error);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::validation_failed(errors.errors.iter().map(ToString::to_string).collect())
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::validation_failed(vec![error.to_string()])
    }
}

/// Types that check their own invariants before they are persisted
pub trait Validatable {
    /// # Errors
    ///
    /// Returns every violated constraint.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Helper validators for common patterns
pub mod validators {
    use super::ValidationError;

    /// Text must contain at least one non-whitespace character
    ///
    /// # Errors
    ///
    /// Fails when `value` is empty or whitespace only.
    pub fn validate_not_blank(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "must not be blank"));
        }
        Ok(())
    }

    /// Integer must be at least `min`
    ///
    /// # Errors
    ///
    /// Fails when `value < min`.
    pub fn validate_at_least(field: &str, value: i64, min: i64) -> Result<(), ValidationError> {
        if value < min {
            return Err(ValidationError::new(field, format!("must be at least {min}")));
        }
        Ok(())
    }
}
