//! Human-readable validation messages
//!
//! Message text is a pluggable policy. [`DefaultMessages`] ships the
//! application's wording; any closure `Fn(&FieldViolation) -> String` can be
//! used in its place.
//!
//! ```rust
//! use workshops::forms::{DefaultMessages, FieldViolation, MessageFormatter};
//!
//! let message = DefaultMessages.format(&FieldViolation::too_short("title", 2));
//! assert_eq!(message, "The title field must be at least 2 characters");
//!
//! let terse = |v: &FieldViolation| format!("{}: {}", v.field(), v.kind());
//! assert_eq!(terse.format(&FieldViolation::missing("title")), "title: missing");
//! ```

use super::validate::{FieldViolation, ViolationKind};

/// Renders a violation as a message for the user
pub trait MessageFormatter: Send + Sync {
    /// Produce the message for `violation`
    fn format(&self, violation: &FieldViolation) -> String;
}

impl<F> MessageFormatter for F
where
    F: Fn(&FieldViolation) -> String + Send + Sync,
{
    fn format(&self, violation: &FieldViolation) -> String {
        self(violation)
    }
}

/// The application's standard English messages
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl MessageFormatter for DefaultMessages {
    fn format(&self, violation: &FieldViolation) -> String {
        let field = violation.field();
        let limit = violation.limit().unwrap_or_default();

        match violation.kind() {
            ViolationKind::Missing => format!("The {field} field is required"),
            ViolationKind::TooShort => {
                format!("The {field} field must be at least {limit} characters")
            }
            ViolationKind::TooLong => {
                format!("The {field} field must be less than {limit} characters")
            }
        }
    }
}
