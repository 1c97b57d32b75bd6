//! Session middleware
//!
//! Reads the session cookie, loads the session from the [`SessionStore`] (or
//! starts a new one when the cookie is missing, malformed or stale), and
//! inserts a [`Session`] handle into the request extensions. New sessions get
//! a `Set-Cookie` header on the response.

use super::helpers::read_cookie;
use crate::auth::{Session, SessionId, SessionStore};
use crate::config::SecuritySettings;
use axum::{
    body::Body,
    extract::Request,
    http::{header::SET_COOKIE, HeaderValue},
    response::Response,
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

/// SameSite cookie policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SameSite {
    /// Strict same-site policy
    Strict,
    /// Lax same-site policy
    #[default]
    Lax,
    /// No same-site restriction (requires Secure)
    None,
}

impl SameSite {
    /// Cookie attribute value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

/// Session cookie attributes
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Cookie name
    pub cookie_name: String,
    /// Cookie path
    pub cookie_path: String,
    /// Hide the cookie from scripts
    pub http_only: bool,
    /// Send only over HTTPS
    pub secure: bool,
    /// SameSite policy
    pub same_site: SameSite,
    /// Cookie lifetime in seconds
    pub max_age_secs: u64,
}

impl From<&SecuritySettings> for SessionConfig {
    fn from(settings: &SecuritySettings) -> Self {
        Self {
            cookie_name: settings.session_cookie.clone(),
            cookie_path: "/".to_string(),
            http_only: true,
            secure: settings.secure_cookies,
            same_site: SameSite::Lax,
            max_age_secs: settings.session_max_age_secs,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&SecuritySettings::default())
    }
}

impl SessionConfig {
    /// `Set-Cookie` value for session `id`
    #[must_use]
    pub fn cookie(&self, id: &SessionId) -> String {
        let mut cookie = format!(
            "{}={}; Path={}; Max-Age={}; SameSite={}",
            self.cookie_name,
            id.as_str(),
            self.cookie_path,
            self.max_age_secs,
            self.same_site.as_str()
        );
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Layer installing [`SessionMiddleware`]
#[derive(Clone, Debug)]
pub struct SessionLayer {
    config: Arc<SessionConfig>,
    store: SessionStore,
}

impl SessionLayer {
    /// Layer over `store` with cookie attributes from `config`
    #[must_use]
    pub fn new(store: SessionStore, config: SessionConfig) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionMiddleware {
            inner,
            config: Arc::clone(&self.config),
            store: self.store.clone(),
        }
    }
}

/// Cookie session middleware
#[derive(Clone, Debug)]
pub struct SessionMiddleware<S> {
    inner: S,
    config: Arc<SessionConfig>,
    store: SessionStore,
}

impl<S> Service<Request> for SessionMiddleware<S>
where
    S: Service<Request, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let config = Arc::clone(&self.config);
        let store = self.store.clone();
        // Take the service that was driven to readiness, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let existing = read_cookie(req.headers(), &config.cookie_name)
                .and_then(|value| value.parse::<SessionId>().ok())
                .filter(|id| store.load(id).is_some());

            let (id, is_new) = match existing {
                Some(id) => (id, false),
                None => (store.create(), true),
            };

            req.extensions_mut().insert(Session::new(id.clone(), store));

            let mut response = inner.call(req).await?;

            if is_new {
                match HeaderValue::from_str(&config.cookie(&id)) {
                    Ok(value) => {
                        response.headers_mut().append(SET_COOKIE, value);
                    }
                    Err(err) => tracing::error!("invalid session cookie: {}", err),
                }
            }

            Ok(response)
        })
    }
}
