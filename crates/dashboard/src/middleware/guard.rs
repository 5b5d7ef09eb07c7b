//! Route guard: coarse, cookie-presence-only redirects.
//!
//! Runs on every request before any handler. It never talks to the identity
//! provider and never checks the cookie's contents; a forged or expired
//! token passes here and is caught by the session gate on the page itself.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::state::AppState;

/// Public login page.
pub const LOGIN_PATH: &str = "/login";
/// Landing page for authenticated users.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Site root, left open by the guard.
pub const ROOT_PATH: &str = "/";

/// Outcome of the guard for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through unmodified.
    Allow,
    /// Answer with a redirect to the given path.
    Redirect(&'static str),
}

/// Whether the guard applies to `path` at all.
///
/// Anything whose path starts with `api` (`/api`, `/api/...`, `/apis`),
/// static assets, health probes, the favicon, and any path containing a `.`
/// bypass the guard.
#[must_use]
pub fn is_guarded(path: &str) -> bool {
    const EXCLUDED_PREFIXES: &[&str] = &["api", "static/", "health", "favicon.ico"];

    let rest = path.strip_prefix('/').unwrap_or(path);
    if EXCLUDED_PREFIXES.iter().any(|prefix| rest.starts_with(prefix)) {
        return false;
    }
    !path.contains('.')
}

/// `/login` and anything beneath it.
fn is_public(path: &str) -> bool {
    path == LOGIN_PATH
        || path
            .strip_prefix(LOGIN_PATH)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Decide what to do with a request for `path`.
///
/// - login page with a session cookie: send to the dashboard
/// - anything but login pages and `/` without a session cookie: send to login
/// - everything else passes
#[must_use]
pub fn decide(path: &str, has_session_cookie: bool) -> GuardDecision {
    if has_session_cookie && path == LOGIN_PATH {
        return GuardDecision::Redirect(DASHBOARD_PATH);
    }
    if !has_session_cookie && !is_public(path) && path != ROOT_PATH {
        return GuardDecision::Redirect(LOGIN_PATH);
    }
    GuardDecision::Allow
}

/// Whether the jar holds a non-empty session-token cookie.
#[must_use]
pub fn has_session_cookie(jar: &CookieJar, cookie_name: &str) -> bool {
    jar.get(cookie_name)
        .is_some_and(|cookie| !cookie.value().is_empty())
}

/// Middleware applying [`decide`] to every guarded request.
pub async fn route_guard_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !is_guarded(path) {
        return next.run(request).await;
    }

    let has_cookie = has_session_cookie(&jar, state.session_cookie_name());
    match decide(path, has_cookie) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(target) => {
            tracing::debug!(
                path = request.uri().path(),
                has_cookie,
                target,
                "route guard redirect"
            );
            Redirect::to(target).into_response()
        }
    }
}
