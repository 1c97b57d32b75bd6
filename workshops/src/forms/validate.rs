//! Rule-driven form validation
//!
//! [`validate`] checks every field declared in a [`RuleSet`] against a
//! [`SubmittedForm`] and either returns the validated values or every
//! violation found. Validation failures are data, not errors: the caller
//! always receives a [`ValidationResult`].

use super::rules::{FieldRule, RuleSet};
use super::submitted::SubmittedForm;
use std::fmt;

/// The kind of rule a field broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Required field was absent or empty
    Missing,
    /// Value shorter than the configured minimum
    TooShort,
    /// Value longer than the configured maximum
    TooLong,
}

impl ViolationKind {
    /// Stable machine-readable code
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single rule breach for a single field
///
/// The constructors keep `limit` consistent with `kind`: it is `None` for
/// [`ViolationKind::Missing`] and the relevant threshold otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldViolation {
    field: String,
    kind: ViolationKind,
    limit: Option<usize>,
}

impl FieldViolation {
    /// Required field absent or empty
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::Missing,
            limit: None,
        }
    }

    /// Value shorter than `min`
    #[must_use]
    pub fn too_short(field: impl Into<String>, min: usize) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::TooShort,
            limit: Some(min),
        }
    }

    /// Value longer than `max`
    #[must_use]
    pub fn too_long(field: impl Into<String>, max: usize) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::TooLong,
            limit: Some(max),
        }
    }

    /// Field name
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Violation kind
    #[must_use]
    pub const fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Threshold that was crossed, absent for missing values
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }
}

/// Values that passed validation, one per declared field, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedValues {
    values: Vec<(String, String)>,
}

impl ValidatedValues {
    /// Value of a declared field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over `(field, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of values
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Outcome of validating a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Every declared field satisfied its rule
    Valid {
        /// Values of the declared fields
        values: ValidatedValues,
    },
    /// At least one field broke its rule
    Invalid {
        /// Violations in rule declaration order
        violations: Vec<FieldViolation>,
        /// The original submission, undeclared fields included
        submitted: SubmittedForm,
    },
}

impl ValidationResult {
    /// Whether the submission passed
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Violations, empty when valid
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Valid { .. } => &[],
            Self::Invalid { violations, .. } => violations,
        }
    }
}

/// Validate `form` against `rules`
///
/// Fields are visited in the rule set's declaration order and all
/// violations are collected. A required field that is empty yields a single
/// [`ViolationKind::Missing`] and no length checks. Fields without a rule are
/// neither checked nor copied into the validated values.
///
/// # Example
///
/// ```rust
/// use workshops::forms::{validate, FieldRule, RuleSet, SubmittedForm, ViolationKind};
///
/// let rules = RuleSet::builder()
///     .field("title", FieldRule::required().min_length(2).max_length(40))
///     .build()?;
///
/// let result = validate(&SubmittedForm::new().with("title", "A"), &rules);
/// assert_eq!(result.violations()[0].kind(), ViolationKind::TooShort);
/// assert_eq!(result.violations()[0].limit(), Some(2));
/// # Ok::<(), workshops::forms::RuleError>(())
/// ```
#[must_use]
pub fn validate(form: &SubmittedForm, rules: &RuleSet) -> ValidationResult {
    let mut violations = Vec::new();
    let mut values = Vec::with_capacity(rules.len());

    for (field, rule) in rules.iter() {
        let value = effective_value(form.get(field).unwrap_or_default(), rule);

        if let Some(violation) = check_field(field, value, rule) {
            violations.push(violation);
        }
        values.push((field.to_string(), value.to_string()));
    }

    if violations.is_empty() {
        ValidationResult::Valid {
            values: ValidatedValues { values },
        }
    } else {
        ValidationResult::Invalid {
            violations,
            submitted: form.clone(),
        }
    }
}

fn effective_value<'a>(raw: &'a str, rule: &FieldRule) -> &'a str {
    if rule.trims() {
        raw.trim()
    } else {
        raw
    }
}

fn check_field(field: &str, value: &str, rule: &FieldRule) -> Option<FieldViolation> {
    if value.is_empty() {
        return rule
            .is_required()
            .then(|| FieldViolation::missing(field));
    }

    let length = value.chars().count();

    if let Some(min) = rule.min() {
        if length < min {
            return Some(FieldViolation::too_short(field, min));
        }
    }

    if let Some(max) = rule.max() {
        if length > max {
            return Some(FieldViolation::too_long(field, max));
        }
    }

    None
}
