//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Health check (unguarded)
//! GET  /static/*            - Stylesheets (unguarded)
//!
//! GET  /                    - Redirect to /dashboard
//!
//! # Auth
//! GET  /login               - Login page with account-type chooser
//! POST /login               - Password sign-in + role check
//! POST /logout              - Sign out, expire cookie
//!
//! # Gated pages
//! GET  /dashboard           - Role-specific dashboard
//! GET  /{section}           - Section placeholder (403 without capability)
//! ```

pub mod auth;
pub mod dashboard;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::middleware::{request_id_middleware, route_guard_middleware, security_headers_middleware};
use crate::state::AppState;

/// Directory served under `/static`.
const STATIC_DIR: &str = "crates/dashboard/static";

/// Page and form routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::root))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::index))
        .route("/{section}", get(dashboard::section))
}

/// Full application router with the request-level middleware applied.
///
/// Tracing and Sentry layers are added by `main` around this.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(from_fn_with_state(state.clone(), route_guard_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}
