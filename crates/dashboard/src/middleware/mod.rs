//! HTTP middleware stack for the dashboard.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record/propagate `x-request-id`)
//! 4. Security headers
//! 5. Route guard (cookie-presence redirects)
//!
//! The session gate is not a layer: protected handlers take the
//! [`RequireSession`](crate::gate::RequireSession) extractor.

pub mod guard;
pub mod request_id;
pub mod security_headers;

pub use guard::{DASHBOARD_PATH, LOGIN_PATH, ROOT_PATH, route_guard_middleware};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
