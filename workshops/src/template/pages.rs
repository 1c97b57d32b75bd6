//! Page templates

use crate::auth::User;
use crate::db::{Workshop, WorkshopId, WorkshopSummary};
use crate::forms::{FormBinding, ValidationErrors};
use askama::Template;

/// Error page, also used for 404s
#[derive(Debug, Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    /// Message shown to the user
    pub message: String,
}

/// Home page: workshop list plus login or logout control
#[derive(Debug, Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    /// Every workshop
    pub workshops: Vec<WorkshopSummary>,
    /// Signed-in user, if any
    pub user: Option<User>,
}

/// Workshop detail page
#[derive(Debug, Template)]
#[template(path = "workshops/show.html")]
pub struct WorkshopPage {
    /// The workshop shown
    pub workshop: Workshop,
}

/// Workshop edit form
#[derive(Debug, Template)]
#[template(path = "workshops/edit.html")]
pub struct EditWorkshopPage {
    /// Workshop being edited
    pub workshop_id: WorkshopId,
    /// Field values, constraints and errors
    pub binding: FormBinding,
}

/// Login form
#[derive(Debug, Default, Template)]
#[template(path = "auth/login.html")]
pub struct LoginPage {
    /// Email to prefill
    pub email: String,
    /// Where to go after signing in
    pub redirect_to: String,
    /// Per-field errors
    pub errors: ValidationErrors,
    /// Form-level error
    pub failure: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserId;
    use crate::forms::workshop::{workshop_binding, workshop_rules};
    use crate::forms::{DefaultMessages, FieldViolation, SubmittedForm};
    use chrono::{TimeZone, Utc};

    // Older askama releases escape `/` in output
    fn render(page: &impl Template) -> String {
        page.render().unwrap().replace("&#x2f;", "/")
    }

    fn workshop() -> Workshop {
        let date = Utc.with_ymd_and_hms(2022, 11, 1, 0, 0, 0).unwrap();
        Workshop {
            id: WorkshopId::new("w1"),
            title: "Beginner <HTML>".to_string(),
            description: "Learn HTML".to_string(),
            date,
            price: 599,
            seats_left: 8,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn test_error_page() {
        let html = render(&ErrorPage {
            message: "No workshop with the ID abc exists.".to_string(),
        });
        assert!(html.contains("No workshop with the ID abc exists."));
    }

    #[test]
    fn test_index_page_links_and_login() {
        let page = IndexPage {
            workshops: vec![WorkshopSummary {
                id: WorkshopId::new("w1"),
                title: "Beginner HTML".to_string(),
            }],
            user: None,
        };
        let html = render(&page);
        assert!(html.contains(r#"href="/workshops/w1""#));
        assert!(html.contains("Beginner HTML"));
        assert!(html.contains(r#"href="/login""#));
        assert!(!html.contains("Logout"));
    }

    #[test]
    fn test_index_page_logout_button() {
        let date = Utc::now();
        let page = IndexPage {
            workshops: Vec::new(),
            user: Some(User {
                id: UserId::new("u1"),
                email: "rachel@remix.run".to_string(),
                created_at: date,
                updated_at: date,
            }),
        };
        let html = render(&page);
        assert!(html.contains("Logout of rachel@remix.run"));
        assert!(html.contains(r#"action="/logout""#));
    }

    #[test]
    fn test_workshop_page_escapes_and_links() {
        let html = render(&WorkshopPage {
            workshop: workshop(),
        });
        assert!(html.contains("Beginner &lt;HTML&gt;"));
        assert!(html.contains("$5.99"));
        assert!(html.contains(r#"href="/workshops/w1/edit""#));
    }

    #[test]
    fn test_edit_page_constraints_and_errors() {
        let rules = workshop_rules().unwrap();
        let submitted = SubmittedForm::new().with("title", "A").with("description", "");
        let binding = workshop_binding(&rules, "Beginner HTML", "Learn HTML").redisplay(
            &[
                FieldViolation::too_short("title", 2),
                FieldViolation::missing("description"),
            ],
            &submitted,
            &DefaultMessages,
        );

        let html = render(&EditWorkshopPage {
            workshop_id: WorkshopId::new("w1"),
            binding,
        });

        assert!(html.contains(r#"href="/workshops/w1""#));
        assert!(html.contains(r#"minlength="2""#));
        assert!(html.contains(r#"maxlength="40""#));
        assert!(html.contains(r#"maxlength="1000""#));
        assert!(html.contains(r#"value="A""#));
        assert!(html.contains("<textarea"));
        assert!(html.contains("The title field must be at least 2 characters"));
        assert!(html.contains("The description field is required"));
    }

    #[test]
    fn test_edit_page_failure_banner() {
        let rules = workshop_rules().unwrap();
        let binding = workshop_binding(&rules, "Beginner HTML", "Learn HTML")
            .with_failure("Could not save the workshop");
        let html = render(&EditWorkshopPage {
            workshop_id: WorkshopId::new("w1"),
            binding,
        });
        assert!(html.contains("Could not save the workshop"));
    }

    #[test]
    fn test_login_page() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "email", "Enter a valid email address");
        let html = render(&LoginPage {
            email: "rachel".to_string(),
            redirect_to: "/workshops/w1/edit".to_string(),
            errors,
            failure: Some("Invalid email or password".to_string()),
        });

        assert!(html.contains(r#"value="rachel""#));
        assert!(html.contains(r#"name="redirect_to" value="/workshops/w1/edit""#));
        assert!(html.contains("Enter a valid email address"));
        assert!(html.contains("Invalid email or password"));
    }
}
