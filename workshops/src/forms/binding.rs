//! Presentation binding for redisplaying forms
//!
//! A [`FormBinding`] is the read-only view a template renders: for each field
//! declared in the rule set it provides a value that is never undefined and
//! at most one formatted error.

use super::messages::MessageFormatter;
use super::rules::{FieldRule, RuleSet};
use super::submitted::SubmittedForm;
use super::validate::FieldViolation;
use std::collections::HashMap;

/// How a field is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Widget {
    /// Single-line text input
    #[default]
    Input,
    /// Multi-line textarea
    Textarea,
}

/// One field as the renderer sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundField {
    name: String,
    label: String,
    widget: Widget,
    rule: FieldRule,
    value: String,
    error: Option<String>,
}

impl BoundField {
    /// Field name, used for the `name` and `id` attributes
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label text
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the field renders as a textarea
    #[must_use]
    pub fn is_textarea(&self) -> bool {
        self.widget == Widget::Textarea
    }

    /// Current value: submitted, else stored, else empty
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// First error for this field, formatted
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the field has an error
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether the `required` attribute applies
    #[must_use]
    pub const fn required(&self) -> bool {
        self.rule.is_required()
    }

    /// `minlength` attribute value
    #[must_use]
    pub const fn min_length(&self) -> Option<usize> {
        self.rule.min()
    }

    /// `maxlength` attribute value
    #[must_use]
    pub const fn max_length(&self) -> Option<usize> {
        self.rule.max()
    }
}

/// Per-field view of a form for rendering
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use workshops::forms::{
///     DefaultMessages, FieldRule, FieldViolation, FormBinding, RuleSet, SubmittedForm,
/// };
///
/// let rules = RuleSet::builder()
///     .field("title", FieldRule::required().min_length(2))
///     .field("description", FieldRule::required())
///     .build()?;
/// let stored = HashMap::from([("title".to_string(), "Beginner HTML".to_string())]);
///
/// let binding = FormBinding::new(&rules, &stored).redisplay(
///     &[FieldViolation::too_short("title", 2)],
///     &SubmittedForm::new().with("title", "B"),
///     &DefaultMessages,
/// );
///
/// let title = binding.field("title").unwrap();
/// assert_eq!(title.value(), "B");
/// assert_eq!(title.error(), Some("The title field must be at least 2 characters"));
/// assert_eq!(binding.field("description").unwrap().value(), "");
/// # Ok::<(), workshops::forms::RuleError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormBinding {
    fields: Vec<BoundField>,
    failure: Option<String>,
}

impl FormBinding {
    /// Bind a fresh form to the entity's stored values
    #[must_use]
    pub fn new(rules: &RuleSet, stored: &HashMap<String, String>) -> Self {
        let fields = rules
            .iter()
            .map(|(name, rule)| BoundField {
                name: name.to_string(),
                label: default_label(name),
                widget: Widget::Input,
                rule: *rule,
                value: stored.get(name).cloned().unwrap_or_default(),
                error: None,
            })
            .collect();

        Self {
            fields,
            failure: None,
        }
    }

    /// Overlay a failed submission: submitted values win over stored ones,
    /// and each field shows its first violation
    #[must_use]
    pub fn redisplay(
        mut self,
        violations: &[FieldViolation],
        submitted: &SubmittedForm,
        formatter: &dyn MessageFormatter,
    ) -> Self {
        for field in &mut self.fields {
            if let Some(value) = submitted.get(&field.name) {
                value.clone_into(&mut field.value);
            }
            field.error = violations
                .iter()
                .find(|violation| violation.field() == field.name)
                .map(|violation| formatter.format(violation));
        }
        self
    }

    /// Attach a form-level failure message
    #[must_use]
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Override the label of `name`
    #[must_use]
    pub fn label(mut self, name: &str, label: impl Into<String>) -> Self {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.label = label.into();
        }
        self
    }

    /// Render `name` as a textarea
    #[must_use]
    pub fn textarea(mut self, name: &str) -> Self {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.widget = Widget::Textarea;
        }
        self
    }

    /// Fields in rule declaration order
    #[must_use]
    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    /// Look up a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&BoundField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Form-level failure message
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Whether any field or the form itself has an error
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.failure.is_some() || self.fields.iter().any(BoundField::has_error)
    }
}

fn default_label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::messages::DefaultMessages;

    fn rules() -> RuleSet {
        RuleSet::builder()
            .field("title", FieldRule::required().min_length(2).max_length(40))
            .field(
                "description",
                FieldRule::required().min_length(2).max_length(1000),
            )
            .build()
            .unwrap()
    }

    fn stored() -> HashMap<String, String> {
        HashMap::from([
            ("title".to_string(), "Beginner HTML".to_string()),
            ("description".to_string(), "Learn HTML".to_string()),
        ])
    }

    #[test]
    fn test_fresh_binding_uses_stored_values() {
        let binding = FormBinding::new(&rules(), &stored());

        assert_eq!(binding.fields().len(), 2);
        assert_eq!(binding.field("title").unwrap().value(), "Beginner HTML");
        assert_eq!(binding.field("description").unwrap().value(), "Learn HTML");
        assert!(!binding.has_errors());
    }

    #[test]
    fn test_every_field_has_a_value() {
        let binding = FormBinding::new(&rules(), &HashMap::new());
        assert!(binding.fields().iter().all(|f| f.value().is_empty()));
    }

    #[test]
    fn test_redisplay_prefers_submitted_values() {
        let submitted = SubmittedForm::new().with("title", "X");
        let binding = FormBinding::new(&rules(), &stored()).redisplay(
            &[FieldViolation::too_short("title", 2)],
            &submitted,
            &DefaultMessages,
        );

        let title = binding.field("title").unwrap();
        assert_eq!(title.value(), "X");
        assert_eq!(
            title.error(),
            Some("The title field must be at least 2 characters")
        );

        let description = binding.field("description").unwrap();
        assert_eq!(description.value(), "Learn HTML");
        assert!(!description.has_error());
        assert!(binding.has_errors());
    }

    #[test]
    fn test_submitted_empty_value_is_kept() {
        let submitted = SubmittedForm::new().with("title", "");
        let binding = FormBinding::new(&rules(), &stored()).redisplay(
            &[FieldViolation::missing("title")],
            &submitted,
            &DefaultMessages,
        );

        assert_eq!(binding.field("title").unwrap().value(), "");
    }

    #[test]
    fn test_only_first_violation_shown() {
        let violations = [
            FieldViolation::missing("title"),
            FieldViolation::too_long("title", 40),
        ];
        let binding = FormBinding::new(&rules(), &stored()).redisplay(
            &violations,
            &SubmittedForm::new(),
            &DefaultMessages,
        );

        assert_eq!(
            binding.field("title").unwrap().error(),
            Some("The title field is required")
        );
    }

    #[test]
    fn test_labels_and_widgets() {
        let binding = FormBinding::new(&rules(), &stored())
            .label("title", "Workshop title")
            .textarea("description");

        assert_eq!(binding.field("title").unwrap().label(), "Workshop title");
        assert!(!binding.field("title").unwrap().is_textarea());
        assert_eq!(binding.field("description").unwrap().label(), "Description");
        assert!(binding.field("description").unwrap().is_textarea());
    }

    #[test]
    fn test_constraint_attributes() {
        let binding = FormBinding::new(&rules(), &stored());
        let title = binding.field("title").unwrap();
        assert!(title.required());
        assert_eq!(title.min_length(), Some(2));
        assert_eq!(title.max_length(), Some(40));
    }

    #[test]
    fn test_failure_message() {
        let binding = FormBinding::new(&rules(), &stored()).with_failure("Could not save");
        assert_eq!(binding.failure(), Some("Could not save"));
        assert!(binding.has_errors());
    }

    #[test]
    fn test_default_label() {
        assert_eq!(default_label("seats_left"), "Seats left");
        assert_eq!(default_label(""), "");
    }
}
