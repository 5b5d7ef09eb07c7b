//! Session gate: resolves who is asking and in which role.
//!
//! Every protected page runs the gate once before rendering anything. It
//! asks the identity provider for the user behind the session cookie, then
//! reads that user's role from the role table. Any failure on the way ends
//! in [`RoleResolution::Denied`], which handlers turn into a redirect to the
//! login page.
//!
//! Handlers never see a [`RoleResolution`]: they take [`RequireSession`],
//! which only exists for a resolved role. There is no default role that a
//! template could render while resolution is still in flight.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, cookie::Cookie};

use solid_express_core::{UserId, UserRole};

use crate::middleware::guard::LOGIN_PATH;
use crate::provider::{IdentityProvider, RoleDirectory};
use crate::state::AppState;

/// Identity of a user whose role has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// Provider-issued id.
    pub id: UserId,
    /// Account email, when the provider reports one.
    pub email: Option<String>,
    /// Role read from the role table.
    pub role: UserRole,
}

/// Why the gate refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No session-token cookie on the request.
    NoSession,
    /// Provider does not know the token.
    NoUser,
    /// Provider could not be asked about the token.
    UserLookupFailed,
    /// Role row missing, unreadable, or the table could not be reached.
    RoleLookupFailed,
}

/// Progress of role resolution for one page request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoleResolution {
    /// Lookups not finished; nothing role-specific may be shown.
    #[default]
    Unresolved,
    /// User and role confirmed by the backend.
    Resolved(SessionUser),
    /// Resolution failed; the user is treated as signed out.
    Denied(DenialReason),
}

impl RoleResolution {
    /// The resolved user, if any. `Unresolved` and `Denied` both yield `None`.
    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Resolved(user) => Some(user),
            Self::Unresolved | Self::Denied(_) => None,
        }
    }
}

/// Run the gate for `access_token`.
///
/// No retries: the first failure is final.
pub async fn resolve(
    identity: &dyn IdentityProvider,
    roles: &dyn RoleDirectory,
    access_token: Option<&str>,
) -> RoleResolution {
    let Some(token) = access_token.filter(|t| !t.is_empty()) else {
        return RoleResolution::Denied(DenialReason::NoSession);
    };

    let user = match identity.get_user(token).await {
        Ok(Some(user)) => user,
        Ok(None) => return RoleResolution::Denied(DenialReason::NoUser),
        Err(e) => {
            tracing::warn!(error = %e, "session gate: current-user lookup failed");
            return RoleResolution::Denied(DenialReason::UserLookupFailed);
        }
    };

    match roles.fetch_role(user.id, token).await {
        Ok(role) => RoleResolution::Resolved(SessionUser {
            id: user.id,
            email: user.email,
            role,
        }),
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "session gate: role lookup failed");
            RoleResolution::Denied(DenialReason::RoleLookupFailed)
        }
    }
}

/// Expire the session-token cookie in `jar`.
///
/// Only emits a removal cookie when the request actually carried one.
#[must_use]
pub fn expire_session_cookie(jar: CookieJar, cookie_name: &str) -> CookieJar {
    jar.remove(Cookie::build((cookie_name.to_owned(), "")).path("/"))
}

/// Extractor that runs the session gate.
///
/// Rejects with a redirect to the login page (and an expired session
/// cookie) unless the role resolves.
///
/// # Example
///
/// ```rust,ignore
/// async fn page(RequireSession(user): RequireSession) -> impl IntoResponse {
///     format!("role: {}", user.role)
/// }
/// ```
pub struct RequireSession(pub SessionUser);

/// Rejection for [`RequireSession`].
pub struct GateRejection {
    jar: CookieJar,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        (self.jar, Redirect::to(LOGIN_PATH)).into_response()
    }
}

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = GateRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie_name = state.session_cookie_name();
        let token = jar.get(cookie_name).map(|c| c.value().to_owned());

        match resolve(state.identity(), state.roles(), token.as_deref()).await {
            RoleResolution::Resolved(user) => {
                crate::error::set_sentry_user(&user.id.to_string(), user.role.as_str());
                Ok(Self(user))
            }
            RoleResolution::Denied(reason) => {
                tracing::debug!(?reason, path = %parts.uri.path(), "session gate denied");
                Err(GateRejection {
                    jar: expire_session_cookie(jar, cookie_name),
                })
            }
            RoleResolution::Unresolved => Err(GateRejection {
                jar: expire_session_cookie(jar, cookie_name),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::provider::testing::FakeBackend;

    #[tokio::test]
    async fn test_missing_token_is_denied_without_calls() {
        let backend = FakeBackend::with_role(UserRole::Administrator);
        let resolution = resolve(&backend, &backend, None).await;

        assert_eq!(resolution, RoleResolution::Denied(DenialReason::NoSession));
        assert_eq!(backend.get_user_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_token_is_denied_before_role_lookup() {
        let backend = FakeBackend::with_role(UserRole::Administrator);
        let resolution = resolve(&backend, &backend, Some("expired")).await;

        assert_eq!(resolution, RoleResolution::Denied(DenialReason::NoUser));
        assert!(resolution.user().is_none());
        assert_eq!(backend.role_calls(), 0);
    }

    #[tokio::test]
    async fn test_user_lookup_failure_is_denied() {
        let mut backend = FakeBackend::with_role(UserRole::Administrator);
        backend.get_user_fails = true;
        let resolution = resolve(&backend, &backend, Some("valid-token")).await;

        assert_eq!(
            resolution,
            RoleResolution::Denied(DenialReason::UserLookupFailed)
        );
    }

    #[tokio::test]
    async fn test_role_lookup_failure_is_denied() {
        let mut backend = FakeBackend::with_role(UserRole::Administrator);
        backend.role_lookup_fails = true;
        let resolution = resolve(&backend, &backend, Some("valid-token")).await;

        assert_eq!(
            resolution,
            RoleResolution::Denied(DenialReason::RoleLookupFailed)
        );
        assert_eq!(backend.role_calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_role_row_is_denied() {
        let mut backend = FakeBackend::with_role(UserRole::Courier);
        backend.role = None;
        let resolution = resolve(&backend, &backend, Some("valid-token")).await;

        assert_eq!(
            resolution,
            RoleResolution::Denied(DenialReason::RoleLookupFailed)
        );
    }

    #[tokio::test]
    async fn test_resolves_stored_role() {
        let backend = FakeBackend::with_role(UserRole::Courier);
        let resolution = resolve(&backend, &backend, Some("valid-token")).await;

        let user = resolution.user().unwrap();
        assert_eq!(user.role, UserRole::Courier);
        assert_eq!(user.id, backend.user_id);
    }

    #[test]
    fn test_unresolved_is_never_a_user() {
        assert_eq!(RoleResolution::default(), RoleResolution::Unresolved);
        assert!(RoleResolution::Unresolved.user().is_none());
    }
}
