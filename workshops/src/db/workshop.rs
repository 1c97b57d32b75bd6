//! Workshop model
//!
//! ```sql
//! CREATE TABLE workshops (
//!     id TEXT PRIMARY KEY NOT NULL,
//!     title TEXT NOT NULL,
//!     description TEXT NOT NULL,
//!     date TEXT NOT NULL,
//!     price INTEGER NOT NULL,       -- minor units (cents)
//!     seats_left INTEGER NOT NULL,
//!     created_at TEXT NOT NULL,
//!     updated_at TEXT NOT NULL
//! );
//! ```

use crate::forms::workshop::{DESCRIPTION, TITLE};
use crate::forms::{EntityRef, Persist, PersistError, ValidatedValues};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool, Type};
use std::fmt;
use uuid::Uuid;

/// Workshop identifier (UUID text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type)]
#[sqlx(transparent)]
pub struct WorkshopId(String);

impl WorkshopId {
    /// A fresh random id
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an id taken from a URL or the database
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `/workshops/{id}`
    #[must_use]
    pub fn path(&self) -> String {
        format!("/workshops/{}", self.0)
    }

    /// `/workshops/{id}/edit`
    #[must_use]
    pub fn edit_path(&self) -> String {
        format!("/workshops/{}/edit", self.0)
    }
}

impl fmt::Display for WorkshopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EntityRef> for WorkshopId {
    fn from(entity: EntityRef) -> Self {
        Self(entity.as_str().to_string())
    }
}

/// Id and title, for listings
#[derive(Debug, Clone, FromRow)]
pub struct WorkshopSummary {
    /// Primary key
    pub id: WorkshopId,

    /// Display title
    pub title: String,
}

/// A scheduled workshop
#[derive(Debug, Clone, FromRow)]
pub struct Workshop {
    /// Primary key
    pub id: WorkshopId,

    /// Display title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// When the workshop takes place
    pub date: DateTime<Utc>,

    /// Price in cents
    pub price: i64,

    /// Remaining seats
    pub seats_left: i64,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a workshop
#[derive(Debug, Clone)]
pub struct NewWorkshop {
    /// Display title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// When the workshop takes place
    pub date: DateTime<Utc>,

    /// Price in cents
    pub price: i64,

    /// Available seats
    pub seats_left: i64,
}

impl Workshop {
    /// Price formatted as dollars, e.g. `$5.99`
    #[must_use]
    pub fn price_display(&self) -> String {
        let sign = if self.price < 0 { "-" } else { "" };
        let cents = self.price.unsigned_abs();
        format!("{sign}${}.{:02}", cents / 100, cents % 100)
    }

    /// Date formatted for humans, e.g. `November 1, 2022`
    #[must_use]
    pub fn date_display(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }

    /// Every workshop's id and title, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_summaries(pool: &SqlitePool) -> Result<Vec<WorkshopSummary>, sqlx::Error> {
        sqlx::query_as::<_, WorkshopSummary>(
            "SELECT id, title FROM workshops ORDER BY created_at, title",
        )
        .fetch_all(pool)
        .await
    }

    /// Find a workshop by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. A missing workshop is `Ok(None)`.
    pub async fn find(id: &WorkshopId, pool: &SqlitePool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, title, description, date, price, seats_left, created_at, updated_at
            FROM workshops
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Insert a new workshop
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(new: NewWorkshop, pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        let workshop = Self {
            id: WorkshopId::generate(),
            title: new.title,
            description: new.description,
            date: new.date,
            price: new.price,
            seats_left: new.seats_left,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO workshops
                (id, title, description, date, price, seats_left, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&workshop.id)
        .bind(&workshop.title)
        .bind(&workshop.description)
        .bind(workshop.date)
        .bind(workshop.price)
        .bind(workshop.seats_left)
        .bind(workshop.created_at)
        .bind(workshop.updated_at)
        .execute(pool)
        .await?;

        Ok(workshop)
    }

    /// Replace title and description
    ///
    /// Returns `None` if no workshop has this id.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_details(
        id: &WorkshopId,
        title: &str,
        description: &str,
        pool: &SqlitePool,
    ) -> Result<Option<WorkshopId>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE workshops SET title = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(title)
        .bind(description)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        Ok((result.rows_affected() > 0).then(|| id.clone()))
    }
}

/// Stores validated edit-form values onto one workshop
#[derive(Debug, Clone)]
pub struct WorkshopEditor {
    pool: SqlitePool,
    id: WorkshopId,
}

impl WorkshopEditor {
    /// Editor for the workshop `id`
    #[must_use]
    pub const fn new(pool: SqlitePool, id: WorkshopId) -> Self {
        Self { pool, id }
    }
}

#[async_trait]
impl Persist for WorkshopEditor {
    async fn persist(&self, values: &ValidatedValues) -> Result<EntityRef, PersistError> {
        let (Some(title), Some(description)) = (values.get(TITLE), values.get(DESCRIPTION)) else {
            return Err(PersistError::Rejected(
                "title and description are required".to_string(),
            ));
        };

        match Workshop::update_details(&self.id, title, description, &self.pool).await? {
            Some(id) => {
                tracing::info!(workshop_id = %id, "workshop updated");
                Ok(EntityRef::new(id.as_str()))
            }
            None => Err(PersistError::NotFound(self.id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;
    use crate::forms::{
        handle_submission, workshop::workshop_rules, SubmissionOutcome, SubmittedForm,
    };
    use chrono::TimeZone;

    fn beginner_html() -> NewWorkshop {
        NewWorkshop {
            title: "Beginner HTML".to_string(),
            description: "Learn HTML".to_string(),
            date: Utc.with_ymd_and_hms(2022, 11, 1, 0, 0, 0).unwrap(),
            price: 599,
            seats_left: 8,
        }
    }

    #[test]
    fn test_paths() {
        let id = WorkshopId::new("abc");
        assert_eq!(id.path(), "/workshops/abc");
        assert_eq!(id.edit_path(), "/workshops/abc/edit");
    }

    #[tokio::test]
    async fn test_display_helpers() {
        let pool = memory_pool().await;
        let mut workshop = Workshop::create(beginner_html(), &pool).await.unwrap();

        assert_eq!(workshop.price_display(), "$5.99");
        assert_eq!(workshop.date_display(), "November 1, 2022");

        workshop.price = 12000;
        assert_eq!(workshop.price_display(), "$120.00");
    }

    #[tokio::test]
    async fn test_create_find_list() {
        let pool = memory_pool().await;
        let created = Workshop::create(beginner_html(), &pool).await.unwrap();

        let found = Workshop::find(&created.id, &pool).await.unwrap().unwrap();
        assert_eq!(found.title, "Beginner HTML");
        assert_eq!(found.price, 599);
        assert_eq!(found.date, created.date);

        let summaries = Workshop::list_summaries(&pool).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, created.id);

        assert!(Workshop::find(&WorkshopId::new("nope"), &pool).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_details() {
        let pool = memory_pool().await;
        let created = Workshop::create(beginner_html(), &pool).await.unwrap();

        let updated = Workshop::update_details(&created.id, "Intro HTML", "Start here", &pool)
            .await
            .unwrap();
        assert_eq!(updated, Some(created.id.clone()));

        let found = Workshop::find(&created.id, &pool).await.unwrap().unwrap();
        assert_eq!(found.title, "Intro HTML");
        assert_eq!(found.description, "Start here");
        assert_eq!(found.seats_left, 8);

        let missing = Workshop::update_details(&WorkshopId::new("nope"), "Ab", "Cd", &pool)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_editor_redirects_to_updated_workshop() {
        let pool = memory_pool().await;
        let created = Workshop::create(beginner_html(), &pool).await.unwrap();
        let editor = WorkshopEditor::new(pool.clone(), created.id.clone());
        let rules = workshop_rules().unwrap();
        let form = SubmittedForm::new()
            .with(TITLE, "HTML Basics")
            .with(DESCRIPTION, "Tags and attributes");

        match handle_submission(&form, &rules, &editor).await {
            SubmissionOutcome::Redirect { target } => {
                assert_eq!(WorkshopId::from(target), created.id);
            }
            other => panic!("expected redirect, got {other:?}"),
        }

        let found = Workshop::find(&created.id, &pool).await.unwrap().unwrap();
        assert_eq!(found.title, "HTML Basics");
    }

    #[tokio::test]
    async fn test_editor_reports_missing_workshop() {
        let pool = memory_pool().await;
        let editor = WorkshopEditor::new(pool, WorkshopId::new("gone"));
        let rules = workshop_rules().unwrap();
        let form = SubmittedForm::new()
            .with(TITLE, "HTML Basics")
            .with(DESCRIPTION, "Tags and attributes");

        let outcome = handle_submission(&form, &rules, &editor).await;
        assert!(matches!(
            outcome,
            SubmissionOutcome::PersistFailed {
                reason: PersistError::NotFound(ref id)
            } if id == "gone"
        ));
    }
}
