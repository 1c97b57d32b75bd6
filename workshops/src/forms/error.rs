//! Field errors produced by `validator`-derived forms
//!
//! Forms whose checks go beyond length rules (the login form validates an
//! email address) derive `validator::Validate`. Their errors are collected
//! into [`ValidationErrors`] so templates can show them next to each field,
//! the same way a [`FormBinding`](super::FormBinding) does for rule sets.

use std::collections::BTreeMap;

/// A single validation error for a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The error message
    pub message: String,
    /// Machine-readable code reported by `validator`
    pub code: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validation errors keyed by field name
///
/// ```rust
/// use workshops::forms::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("email", "email", "Enter a valid email address");
///
/// assert!(errors.has_errors());
/// assert_eq!(errors.first("email"), Some("Enter a valid email address"));
/// assert_eq!(errors.first("password"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<FieldError>>,
}

impl ValidationErrors {
    /// Create an empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`
    pub fn add(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(FieldError {
                message: message.into(),
                code: code.into(),
            });
    }

    /// Whether any error was recorded
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All errors for `field`
    #[must_use]
    pub fn for_field(&self, field: &str) -> &[FieldError] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// Message of the first error for `field`
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.for_field(field).first().map(|e| e.message.as_str())
    }

    /// Total number of errors
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut result = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                result.add(field.to_string(), error.code.to_string(), message);
            }
        }
        result
    }
}
