//! Declarative field validation rules
//!
//! A [`RuleSet`] maps field names to [`FieldRule`]s in declaration order.
//! Rule sets are assembled through [`RuleSetBuilder`], which rejects
//! inconsistent configuration so that a bad rule set fails at startup
//! rather than while a request is being handled.
//!
//! # Example
//!
//! ```rust
//! use workshops::forms::{FieldRule, RuleSet};
//!
//! let rules = RuleSet::builder()
//!     .field("title", FieldRule::required().min_length(2).max_length(40))
//!     .field("subtitle", FieldRule::optional().max_length(80))
//!     .build()?;
//!
//! assert!(rules.rules_for("title").is_some_and(|rule| rule.is_required()));
//! assert!(rules.rules_for("unknown").is_none());
//! # Ok::<(), workshops::forms::RuleError>(())
//! ```

use thiserror::Error;

/// Errors raised while assembling a [`RuleSet`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// `min_length` is greater than `max_length`
    #[error("field `{field}`: min_length {min} is greater than max_length {max}")]
    InvertedBounds {
        /// Field the rule belongs to
        field: String,
        /// Configured minimum length
        min: usize,
        /// Configured maximum length
        max: usize,
    },

    /// The same field was declared twice
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),

    /// A field was declared with an empty name
    #[error("field names must not be empty")]
    EmptyFieldName,
}

/// Constraints for a single form field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldRule {
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    trim: bool,
}

impl FieldRule {
    /// A rule for a field that must be present and non-empty
    #[must_use]
    pub const fn required() -> Self {
        Self {
            required: true,
            min_length: None,
            max_length: None,
            trim: false,
        }
    }

    /// A rule for a field that may be left empty
    #[must_use]
    pub const fn optional() -> Self {
        Self {
            required: false,
            min_length: None,
            max_length: None,
            trim: false,
        }
    }

    /// Minimum length in characters, checked only for non-empty values
    #[must_use]
    pub const fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Maximum length in characters
    #[must_use]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Strip leading and trailing whitespace before checking and storing the value
    #[must_use]
    pub const fn trimmed(mut self) -> Self {
        self.trim = true;
        self
    }

    /// Whether the field must be non-empty
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Configured minimum length
    #[must_use]
    pub const fn min(&self) -> Option<usize> {
        self.min_length
    }

    /// Configured maximum length
    #[must_use]
    pub const fn max(&self) -> Option<usize> {
        self.max_length
    }

    /// Whether values are trimmed before validation
    #[must_use]
    pub const fn trims(&self) -> bool {
        self.trim
    }

    fn check(&self, field: &str) -> Result<(), RuleError> {
        match (self.min_length, self.max_length) {
            (Some(min), Some(max)) if min > max => Err(RuleError::InvertedBounds {
                field: field.to_string(),
                min,
                max,
            }),
            _ => Ok(()),
        }
    }
}

/// Ordered, immutable collection of field rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<(String, FieldRule)>,
}

impl RuleSet {
    /// Start building a rule set
    #[must_use]
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Look up the rule declared for `field`
    #[must_use]
    pub fn rules_for(&self, field: &str) -> Option<&FieldRule> {
        self.rules
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rule)| rule)
    }

    /// Iterate over `(field, rule)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Declared field names in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }

    /// Number of declared fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no field is declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Builder for [`RuleSet`]
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<(String, FieldRule)>,
}

impl RuleSetBuilder {
    /// Declare a rule for `name`
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.rules.push((name.into(), rule));
        self
    }

    /// Validate the configuration and produce the rule set
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if a field name is empty or repeated, or if a
    /// rule's minimum length exceeds its maximum length.
    pub fn build(self) -> Result<RuleSet, RuleError> {
        for (index, (name, rule)) in self.rules.iter().enumerate() {
            if name.is_empty() {
                return Err(RuleError::EmptyFieldName);
            }
            if self.rules[..index].iter().any(|(seen, _)| seen == name) {
                return Err(RuleError::DuplicateField(name.clone()));
            }
            rule.check(name)?;
        }

        Ok(RuleSet { rules: self.rules })
    }
}
