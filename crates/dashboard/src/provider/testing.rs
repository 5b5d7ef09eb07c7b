//! In-memory backend for handler tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use secrecy::SecretString;

use solid_express_core::{Email, UserId, UserRole};

use super::{AuthUser, IdentityProvider, ProviderError, RoleDirectory, SignedIn};

/// What the fake answers to a password sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignInOutcome {
    Accept,
    InvalidCredentials,
    EmailNotConfirmed,
    Unavailable,
}

/// Fake identity provider + role table.
///
/// A single account is known; `token` is the session it hands out and
/// accepts.
pub(crate) struct FakeBackend {
    pub user_id: UserId,
    pub token: String,
    pub expires_in: Option<u64>,
    pub role: Option<UserRole>,
    pub sign_in: SignInOutcome,
    pub get_user_fails: bool,
    pub role_lookup_fails: bool,
    pub sign_out_fails: bool,
    revoked: Mutex<Vec<String>>,
    sign_in_calls: AtomicUsize,
    get_user_calls: AtomicUsize,
    role_calls: AtomicUsize,
}

impl FakeBackend {
    #[allow(clippy::unwrap_used)]
    pub(crate) fn with_role(role: UserRole) -> Self {
        Self {
            user_id: UserId::parse("8f14e45f-ceea-4e7a-9b3f-2a7c1d5e6b90").unwrap(),
            token: "valid-token".to_owned(),
            expires_in: Some(3600),
            role: Some(role),
            sign_in: SignInOutcome::Accept,
            get_user_fails: false,
            role_lookup_fails: false,
            sign_out_fails: false,
            revoked: Mutex::new(Vec::new()),
            sign_in_calls: AtomicUsize::new(0),
            get_user_calls: AtomicUsize::new(0),
            role_calls: AtomicUsize::new(0),
        }
    }

    /// Tokens passed to `sign_out`, in call order.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn signed_out(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }

    pub(crate) fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn get_user_calls(&self) -> usize {
        self.get_user_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn role_calls(&self) -> usize {
        self.role_calls.load(Ordering::SeqCst)
    }

    fn unavailable() -> ProviderError {
        ProviderError::Api {
            status: 503,
            message: "backend unavailable".to_owned(),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeBackend {
    async fn sign_in_with_password(
        &self,
        email: &Email,
        _password: &SecretString,
    ) -> Result<SignedIn, ProviderError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        match self.sign_in {
            SignInOutcome::Accept => Ok(SignedIn {
                user: AuthUser {
                    id: self.user_id,
                    email: Some(email.to_string()),
                },
                access_token: SecretString::from(self.token.clone()),
                expires_in: self.expires_in,
            }),
            SignInOutcome::InvalidCredentials => Err(ProviderError::InvalidCredentials),
            SignInOutcome::EmailNotConfirmed => Err(ProviderError::EmailNotConfirmed),
            SignInOutcome::Unavailable => Err(Self::unavailable()),
        }
    }

    #[allow(clippy::unwrap_used)]
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, ProviderError> {
        self.get_user_calls.fetch_add(1, Ordering::SeqCst);
        if self.get_user_fails {
            return Err(Self::unavailable());
        }
        let revoked = self.revoked.lock().unwrap().iter().any(|t| t == access_token);
        if access_token != self.token || revoked {
            return Ok(None);
        }
        Ok(Some(AuthUser {
            id: self.user_id,
            email: None,
        }))
    }

    #[allow(clippy::unwrap_used)]
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.revoked.lock().unwrap().push(access_token.to_owned());
        if self.sign_out_fails {
            return Err(Self::unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl RoleDirectory for FakeBackend {
    async fn fetch_role(
        &self,
        user_id: UserId,
        _access_token: &str,
    ) -> Result<UserRole, ProviderError> {
        self.role_calls.fetch_add(1, Ordering::SeqCst);
        if self.role_lookup_fails {
            return Err(Self::unavailable());
        }
        if user_id != self.user_id {
            return Err(ProviderError::RoleNotFound(user_id));
        }
        self.role.ok_or(ProviderError::RoleNotFound(user_id))
    }
}
