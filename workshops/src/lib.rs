//! workshops: list, view and edit workshops over server-rendered HTML
//!
//! The interesting part is the edit form. Every submission goes through one
//! validate-then-persist contract:
//!
//! 1. The request body is decoded into a [`forms::SubmittedForm`]; a body that
//!    cannot be decoded is rejected with `400` before anything else runs.
//! 2. [`forms::validate`] checks it against a [`forms::RuleSet`] and collects
//!    every [`forms::FieldViolation`] in rule order.
//! 3. [`forms::handle_submission`] persists valid values and answers with a
//!    redirect, or hands back the violations and the raw input so the page can
//!    be re-rendered with errors next to the fields they belong to.
//!
//! The same [`forms::RuleSet`] drives the HTML constraint attributes on the
//! form, so the browser and the server enforce identical limits.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use workshops::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     workshops::observability::init()?;
//!
//!     let state = AppState::connect(WorkshopsConfig::load()?).await?;
//!     workshops::app::serve(state).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Routes
//!
//! | Method | Path                    | Notes                          |
//! |--------|-------------------------|--------------------------------|
//! | GET    | `/`                     | workshop list, login or logout |
//! | GET    | `/workshops/{id}`       | detail page                    |
//! | GET    | `/workshops/{id}/edit`  | edit form, requires login      |
//! | POST   | `/workshops/{id}/edit`  | submit edit, requires login    |
//! | GET    | `/login`, POST `/login` | email and password sign-in     |
//! | POST   | `/logout`               | ends the session               |
//! | GET    | `/health`, `/health/ready` | liveness and readiness      |

#![allow(clippy::missing_errors_doc)]

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod template;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use workshops::prelude::*;
    //! ```

    // Form contract
    pub use crate::forms::{
        handle_submission, validate, DefaultMessages, EntityRef, FieldRule, FieldViolation,
        FormBinding, MessageFormatter, Persist, PersistError, RuleSet, SubmissionOutcome,
        SubmittedForm, ValidationResult, ViolationKind,
    };

    // Authentication
    pub use crate::auth::{Authenticated, OptionalAuth, Session, SessionStore, User};

    // Storage
    pub use crate::db::{Workshop, WorkshopEditor, WorkshopId};

    // Templates
    pub use crate::template::PageTemplate;

    // Configuration, state and errors
    pub use crate::config::WorkshopsConfig;
    pub use crate::error::WorkshopsError;
    pub use crate::state::AppState;

    // Session middleware
    pub use crate::middleware::{SessionConfig, SessionLayer};

    // Re-export key dependencies
    pub use askama;
    pub use axum;
    pub use axum_htmx::HxRequest;
}
