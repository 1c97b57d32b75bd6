//! Workshop pages: list, detail and the edit form

use super::see_other;
use crate::auth::{Authenticated, OptionalAuth};
use crate::db::{Workshop, WorkshopEditor, WorkshopId};
use crate::error::WorkshopsError;
use crate::forms::workshop::{workshop_binding, DESCRIPTION, TITLE};
use crate::forms::{handle_submission, PersistError, SubmissionOutcome, SubmittedForm};
use crate::state::AppState;
use crate::template::{EditWorkshopPage, IndexPage, PageTemplate, WorkshopPage};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use axum_htmx::HxRequest;

/// Banner shown when a valid edit could not be stored; the cause is only logged
pub const SAVE_FAILED: &str = "Could not save the workshop. Please try again.";

/// `GET /`
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Response, WorkshopsError> {
    let workshops = Workshop::list_summaries(state.pool()).await?;
    Ok(IndexPage { workshops, user }.render_html())
}

/// `GET /workshops/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, WorkshopsError> {
    let workshop = find_or_not_found(&state, &WorkshopId::new(id)).await?;
    Ok(WorkshopPage { workshop }.render_html())
}

/// `GET /workshops/{id}/edit`
pub async fn edit(
    State(state): State<AppState>,
    Authenticated(_user): Authenticated,
    Path(id): Path<String>,
) -> Result<Response, WorkshopsError> {
    let workshop = find_or_not_found(&state, &WorkshopId::new(id)).await?;
    let binding =
        workshop_binding(state.workshop_rules(), &workshop.title, &workshop.description);

    Ok(EditWorkshopPage {
        workshop_id: workshop.id,
        binding,
    }
    .render_html())
}

/// `POST /workshops/{id}/edit`
///
/// Valid input is saved and the client is sent to the detail page. Invalid
/// input re-renders the form with `400`, keeping what was typed.
pub async fn update(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    HxRequest(is_htmx): HxRequest,
    Path(id): Path<String>,
    form: SubmittedForm,
) -> Result<Response, WorkshopsError> {
    let id = WorkshopId::new(id);
    let rules = state.workshop_rules();
    let editor = WorkshopEditor::new(state.pool().clone(), id.clone());

    tracing::debug!(workshop_id = %id, user_id = %user.id, "workshop edit submitted");

    match handle_submission(&form, rules, &editor).await {
        SubmissionOutcome::Redirect { target } => {
            Ok(see_other(&WorkshopId::from(target).path(), is_htmx))
        }
        SubmissionOutcome::Redisplay {
            violations,
            submitted,
        } => {
            let workshop = find_or_not_found(&state, &id).await?;
            let binding = workshop_binding(rules, &workshop.title, &workshop.description)
                .redisplay(&violations, &submitted, state.messages());

            Ok(EditWorkshopPage {
                workshop_id: workshop.id,
                binding,
            }
            .render_with_status(StatusCode::BAD_REQUEST))
        }
        SubmissionOutcome::PersistFailed {
            reason: PersistError::NotFound(_),
        } => Err(workshop_not_found(&id)),
        SubmissionOutcome::PersistFailed { reason } => {
            tracing::error!(workshop_id = %id, error = %reason, "failed to save workshop");
            let binding = workshop_binding(
                rules,
                form.get(TITLE).unwrap_or_default(),
                form.get(DESCRIPTION).unwrap_or_default(),
            )
            .with_failure(SAVE_FAILED);

            Ok(EditWorkshopPage {
                workshop_id: id,
                binding,
            }
            .render_with_status(StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

async fn find_or_not_found(state: &AppState, id: &WorkshopId) -> Result<Workshop, WorkshopsError> {
    Workshop::find(id, state.pool())
        .await?
        .ok_or_else(|| workshop_not_found(id))
}

fn workshop_not_found(id: &WorkshopId) -> WorkshopsError {
    WorkshopsError::NotFound(format!("No workshop with the ID {id} exists."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = workshop_not_found(&WorkshopId::new("abc"));
        assert_eq!(err.to_string(), "No workshop with the ID abc exists.");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
