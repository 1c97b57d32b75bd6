//! Demo data
//!
//! Seeding is repeatable for the user, which is deleted and recreated, but
//! inserts the demo workshops again on every run.

use super::workshop::{NewWorkshop, Workshop};
use crate::auth::{User, UserError};
use chrono::{TimeZone, Utc};
use sqlx::SqlitePool;

/// Email of the demo account
pub const DEMO_EMAIL: &str = "rachel@remix.run";

/// Password of the demo account
pub const DEMO_PASSWORD: &str = "racheliscool";

/// What [`seed`] created
#[derive(Debug)]
pub struct SeedReport {
    /// The recreated demo user
    pub user: User,

    /// The inserted workshops
    pub workshops: Vec<Workshop>,
}

/// Recreate the demo user and insert the demo workshops
///
/// # Errors
///
/// Returns an error if any insert or delete fails.
pub async fn seed(pool: &SqlitePool) -> Result<SeedReport, UserError> {
    if User::delete_by_email(DEMO_EMAIL, pool).await? {
        tracing::debug!(email = DEMO_EMAIL, "removed existing demo user");
    }

    let user = User::create(DEMO_EMAIL, DEMO_PASSWORD, pool).await?;

    let mut workshops = Vec::new();
    for new in demo_workshops() {
        workshops.push(Workshop::create(new, pool).await?);
    }

    tracing::info!(workshops = workshops.len(), "database has been seeded");
    Ok(SeedReport { user, workshops })
}

fn demo_workshops() -> Vec<NewWorkshop> {
    [
        ("Beginner HTML", "Learn HTML", 1, 8),
        ("Advanced HTML", "Learn advanced HTML stuff", 4, 12),
    ]
    .into_iter()
    .filter_map(|(title, description, day, seats_left)| {
        Some(NewWorkshop {
            title: title.to_string(),
            description: description.to_string(),
            date: Utc.with_ymd_and_hms(2022, 11, day, 0, 0, 0).single()?,
            price: 599,
            seats_left,
        })
    })
    .collect()
}
