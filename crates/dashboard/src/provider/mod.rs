//! External identity provider and user-role table.
//!
//! The dashboard owns no credentials and no role data. Both live in the
//! hosted backend and are reached through two seams:
//!
//! - [`IdentityProvider`] - password sign-in, current-user lookup, sign-out
//! - [`RoleDirectory`] - read-only role lookup keyed by user id
//!
//! [`SupabaseClient`] implements both against the hosted REST endpoints.
//! It is built once in `main` and handed to the router through `AppState`;
//! nothing in the crate reaches for a process-wide client.

mod supabase;
#[cfg(test)]
pub(crate) mod testing;

pub use supabase::SupabaseClient;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use solid_express_core::{Email, ParseRoleError, UserId, UserRole};

/// Errors returned by the hosted backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Email/password pair rejected.
    #[error("invalid login credentials")]
    InvalidCredentials,

    /// Account exists but the email address was never confirmed.
    #[error("email not confirmed")]
    EmailNotConfirmed,

    /// No row for the user in the role table.
    #[error("no role registered for user {0}")]
    RoleNotFound(UserId),

    /// Role column holds a value outside the known enumeration.
    #[error(transparent)]
    InvalidRole(#[from] ParseRoleError),

    /// Backend answered with an unexpected status.
    #[error("backend returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },

    /// Transport, timeout or body decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built from the configured base URL.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Authenticated user as reported by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    /// Provider-issued user id.
    pub id: UserId,
    /// Email on the account (absent for phone-only users).
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of a successful password sign-in.
#[derive(Debug)]
pub struct SignedIn {
    /// The signed-in user.
    pub user: AuthUser,
    /// Bearer token identifying the new session.
    pub access_token: SecretString,
    /// Seconds until the access token expires, when the provider says.
    pub expires_in: Option<u64>,
}

/// Identity/session operations consumed from the hosted auth service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` / `EmailNotConfirmed` when the provider says so,
    /// other variants for transport or unexpected failures.
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<SignedIn, ProviderError>;

    /// Resolve the user owning `access_token`.
    ///
    /// Returns `Ok(None)` when the token is unknown, revoked or expired.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider cannot be asked.
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, ProviderError>;

    /// End the session behind `access_token`. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider cannot be reached; callers treat
    /// sign-out as best effort.
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;
}

/// Read-only access to the user-role table.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Fetch the stored role of `user_id`, reading with the user's own token.
    ///
    /// # Errors
    ///
    /// `RoleNotFound` for a missing row, `InvalidRole` for an unknown value,
    /// other variants for transport failures.
    async fn fetch_role(&self, user_id: UserId, access_token: &str)
    -> Result<UserRole, ProviderError>;
}
