//! Rules and presentation for the workshop edit form

use super::binding::FormBinding;
use super::rules::{FieldRule, RuleError, RuleSet};
use std::collections::HashMap;

/// Name of the title field
pub const TITLE: &str = "title";

/// Name of the description field
pub const DESCRIPTION: &str = "description";

/// Rule set for editing a workshop
///
/// # Errors
///
/// Returns [`RuleError`] if the rule declarations are inconsistent.
pub fn workshop_rules() -> Result<RuleSet, RuleError> {
    RuleSet::builder()
        .field(TITLE, FieldRule::required().min_length(2).max_length(40))
        .field(
            DESCRIPTION,
            FieldRule::required().min_length(2).max_length(1000),
        )
        .build()
}

/// Binding for the edit form, pre-filled with the stored title and description
#[must_use]
pub fn workshop_binding(rules: &RuleSet, title: &str, description: &str) -> FormBinding {
    let stored = HashMap::from([
        (TITLE.to_string(), title.to_string()),
        (DESCRIPTION.to_string(), description.to_string()),
    ]);

    FormBinding::new(rules, &stored).textarea(DESCRIPTION)
}
