//! Validate-then-persist submission handling
//!
//! [`handle_submission`] runs the validator and, only for valid input, hands
//! the values to a [`Persist`] implementation exactly once. Every path ends in
//! a [`SubmissionOutcome`]; nothing here is fatal to the request.

use super::rules::RuleSet;
use super::submitted::SubmittedForm;
use super::validate::{validate, FieldViolation, ValidatedValues, ValidationResult};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Opaque reference to a persisted entity, used to build the redirect target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef(String);

impl EntityRef {
    /// Wrap an identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure reported by the persistence collaborator
#[derive(Debug, Error)]
pub enum PersistError {
    /// The entity being edited does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The store refused the values
    #[error("rejected: {0}")]
    Rejected(String),

    /// The store failed
    #[error("storage failure: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Persistence collaborator for validated submissions
///
/// Implementations perform a single atomic write. Retries, if any, are
/// their own business.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Persist: Send + Sync {
    /// Store `values`, returning a reference to the stored entity
    async fn persist(&self, values: &ValidatedValues) -> Result<EntityRef, PersistError>;
}

/// Terminal result of handling one submission
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Stored; send the client to the entity
    Redirect {
        /// Entity that was stored
        target: EntityRef,
    },
    /// Validation failed; show the form again
    Redisplay {
        /// Violations in rule declaration order
        violations: Vec<FieldViolation>,
        /// The original submission
        submitted: SubmittedForm,
    },
    /// Input was valid but storing it failed
    PersistFailed {
        /// Why the store failed
        reason: PersistError,
    },
}

/// Validate `form` and persist it when valid
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use workshops::forms::{
///     handle_submission, EntityRef, FieldRule, Persist, PersistError, RuleSet,
///     SubmissionOutcome, SubmittedForm, ValidatedValues,
/// };
///
/// struct Echo;
///
/// #[async_trait]
/// impl Persist for Echo {
///     async fn persist(&self, values: &ValidatedValues) -> Result<EntityRef, PersistError> {
///         Ok(EntityRef::new(values.get("title").unwrap_or_default()))
///     }
/// }
///
/// # tokio_test(async {
/// let rules = RuleSet::builder()
///     .field("title", FieldRule::required().min_length(2))
///     .build()
///     .unwrap();
///
/// let form = SubmittedForm::new().with("title", "Rust");
/// match handle_submission(&form, &rules, &Echo).await {
///     SubmissionOutcome::Redirect { target } => assert_eq!(target.as_str(), "Rust"),
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// # });
/// # fn tokio_test<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
/// # }
/// ```
pub async fn handle_submission<P>(
    form: &SubmittedForm,
    rules: &RuleSet,
    persist: &P,
) -> SubmissionOutcome
where
    P: Persist + ?Sized,
{
    match validate(form, rules) {
        ValidationResult::Invalid {
            violations,
            submitted,
        } => {
            tracing::debug!(
                violations = violations.len(),
                "submission failed validation; redisplaying form"
            );
            SubmissionOutcome::Redisplay {
                violations,
                submitted,
            }
        }
        ValidationResult::Valid { values } => match persist.persist(&values).await {
            Ok(target) => {
                tracing::debug!(target = %target, "submission persisted");
                SubmissionOutcome::Redirect { target }
            }
            Err(reason) => {
                tracing::warn!(error = %reason, "persisting valid submission failed");
                SubmissionOutcome::PersistFailed { reason }
            }
        },
    }
}
