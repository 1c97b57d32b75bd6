//! Form validation and submission handling
//!
//! The edit workflow is built from five small pieces:
//!
//! - [`RuleSet`] / [`FieldRule`]: declarative per-field constraints
//! - [`validate`]: checks a [`SubmittedForm`] against a rule set
//! - [`MessageFormatter`]: turns a [`FieldViolation`] into text
//! - [`handle_submission`]: validate, then persist or report
//! - [`FormBinding`]: what a template needs to redisplay the form
//!
//! # Quick Start
//!
//! ```rust
//! use workshops::forms::{validate, FieldRule, RuleSet, SubmittedForm, ValidationResult};
//!
//! let rules = RuleSet::builder()
//!     .field("title", FieldRule::required().min_length(2).max_length(40))
//!     .field("description", FieldRule::required().min_length(2).max_length(1000))
//!     .build()?;
//!
//! let form = SubmittedForm::new()
//!     .with("title", "Beginner HTML")
//!     .with("description", "Learn HTML");
//!
//! assert!(matches!(validate(&form, &rules), ValidationResult::Valid { .. }));
//! # Ok::<(), workshops::forms::RuleError>(())
//! ```

mod binding;
mod error;
mod messages;
mod rules;
mod submission;
mod submitted;
mod validate;
pub mod workshop;

pub use binding::{BoundField, FormBinding, Widget};
pub use error::{FieldError, ValidationErrors};
pub use messages::{DefaultMessages, MessageFormatter};
pub use rules::{FieldRule, RuleError, RuleSet, RuleSetBuilder};
pub use submission::{handle_submission, EntityRef, Persist, PersistError, SubmissionOutcome};
pub use submitted::{MalformedSubmission, SubmittedForm};
pub use validate::{validate, FieldViolation, ValidatedValues, ValidationResult, ViolationKind};
