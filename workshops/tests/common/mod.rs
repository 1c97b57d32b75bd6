//! Shared harness for integration tests
//!
//! Every test gets its own seeded in-memory database and an `axum-test`
//! server wrapped around the real router.

#![allow(dead_code)]

use axum::http::{header, HeaderName, HeaderValue};
use axum_test::{TestResponse, TestServer};
use sqlx::SqlitePool;
use workshops::{
    config::{DatabaseSettings, WorkshopsConfig},
    db::{self, seed::DEMO_EMAIL, seed::DEMO_PASSWORD, WorkshopId, WorkshopSummary},
    state::AppState,
};

pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");

pub struct TestApp {
    pub server: TestServer,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mut config = WorkshopsConfig::default();
        config.database = DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        };
        config.security.secure_cookies = false;

        let pool = db::connect(&config.database).await.unwrap();
        db::migrate(&pool).await.unwrap();
        db::seed(&pool).await.unwrap();

        let state = AppState::new(config, pool.clone()).unwrap();
        let server = TestServer::new(workshops::app::router(state)).unwrap();

        Self { server, pool }
    }

    /// Seeded workshops, in list order
    pub async fn workshops(&self) -> Vec<WorkshopSummary> {
        workshops::db::Workshop::list_summaries(&self.pool)
            .await
            .unwrap()
    }

    /// Id of the seeded workshop with `title`
    pub async fn workshop_id(&self, title: &str) -> WorkshopId {
        self.workshops()
            .await
            .into_iter()
            .find(|w| w.title == title)
            .map(|w| w.id)
            .expect("seeded workshop")
    }

    /// Sign in as the demo user and return the session cookie
    pub async fn login(&self) -> HeaderValue {
        let response = self
            .server
            .post("/login")
            .form(&[("email", DEMO_EMAIL), ("password", DEMO_PASSWORD)])
            .await;
        response.assert_status(axum::http::StatusCode::SEE_OTHER);
        session_cookie(&response)
    }
}

/// `name=value` part of the response's `Set-Cookie` header
pub fn session_cookie(response: &TestResponse) -> HeaderValue {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header not found")
        .to_str()
        .unwrap()
        .to_string();
    let pair = set_cookie.split(';').next().unwrap().trim().to_string();
    HeaderValue::from_str(&pair).unwrap()
}

/// Response body with askama's escaped slashes restored
pub fn body(response: &TestResponse) -> String {
    response.text().replace("&#x2f;", "/")
}

pub fn assert_location(response: &TestResponse, expected: &str) {
    let actual = response
        .headers()
        .get(header::LOCATION)
        .expect("Location header not found")
        .to_str()
        .unwrap();
    assert_eq!(actual, expected, "Expected Location {expected}, got {actual}");
}

pub fn assert_hx_redirect(response: &TestResponse, expected: &str) {
    let actual = response
        .headers()
        .get("HX-Redirect")
        .expect("HX-Redirect header not found")
        .to_str()
        .unwrap();
    assert_eq!(actual, expected, "Expected HX-Redirect to {expected}, got {actual}");
}
