//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::provider::{IdentityProvider, ProviderError, RoleDirectory, SupabaseClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It is the only owner of the
/// backend client: `main` builds it, the router carries it, and the guard,
/// gate and login handlers borrow the client from here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    identity: Arc<dyn IdentityProvider>,
    roles: Arc<dyn RoleDirectory>,
}

impl AppState {
    /// Create application state from explicit backend implementations.
    #[must_use]
    pub fn new(
        config: DashboardConfig,
        identity: Arc<dyn IdentityProvider>,
        roles: Arc<dyn RoleDirectory>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                identity,
                roles,
            }),
        }
    }

    /// Create application state backed by the hosted REST APIs.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_supabase(config: DashboardConfig) -> Result<Self, ProviderError> {
        let client = Arc::new(SupabaseClient::new(&config.provider)?);
        Ok(Self::new(config, client.clone(), client))
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Get the identity provider.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// Get the user-role directory.
    #[must_use]
    pub fn roles(&self) -> &dyn RoleDirectory {
        self.inner.roles.as_ref()
    }

    /// Name of the session-token cookie.
    #[must_use]
    pub fn session_cookie_name(&self) -> &str {
        &self.inner.config.session_cookie_name
    }
}
