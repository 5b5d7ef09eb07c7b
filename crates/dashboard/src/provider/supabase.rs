//! REST client for the hosted auth (`/auth/v1`) and table (`/rest/v1`) APIs.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use solid_express_core::{Email, UserId, UserRole};

use super::{AuthUser, IdentityProvider, ProviderError, RoleDirectory, SignedIn};
use crate::config::ProviderConfig;

/// Table holding one role row per user.
const ROLE_TABLE: &str = "users";

// ─────────────────────────────────────────────────────────────────────────────
// Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
    user: AuthUser,
}

#[derive(Deserialize)]
struct RoleRow {
    role: String,
}

/// Error body of the auth API.
///
/// Newer deployments send `error_code` + `msg`; older ones send OAuth-style
/// `error` + `error_description`.
#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    error_code: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl AuthErrorBody {
    fn text(&self) -> &str {
        self.msg
            .as_deref()
            .or(self.error_description.as_deref())
            .or(self.message.as_deref())
            .or(self.error.as_deref())
            .unwrap_or("unknown error")
    }
}

/// Map a failed password grant to the error the login form reports.
fn classify_sign_in_failure(status: StatusCode, body: &AuthErrorBody) -> ProviderError {
    let code = body.error_code.as_deref().unwrap_or_default();
    let text = body.text();

    if code == "invalid_credentials" || text.contains("Invalid login credentials") {
        ProviderError::InvalidCredentials
    } else if code == "email_not_confirmed" || text.contains("Email not confirmed") {
        ProviderError::EmailNotConfirmed
    } else {
        ProviderError::Api {
            status: status.as_u16(),
            message: text.to_owned(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the hosted auth and table APIs.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl SupabaseClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("solid-express-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // `Url::join` replaces the last segment unless the base ends in '/'
        let mut base_url = config.url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                client,
                base_url,
                api_key: config.anon_key.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.inner
            .client
            .request(method, url)
            .header("apikey", self.inner.api_key.expose_secret())
    }
}

async fn api_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let message = response.json::<AuthErrorBody>().await.map_or_else(
        |_| "unreadable error body".to_owned(),
        |body| body.text().to_owned(),
    );
    ProviderError::Api { status, message }
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<SignedIn, ProviderError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .request(reqwest::Method::POST, url)
            .json(&PasswordGrant {
                email: email.as_str(),
                password: password.expose_secret(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<AuthErrorBody>().await.unwrap_or_default();
            return Err(classify_sign_in_failure(status, &body));
        }

        let token: TokenResponse = response.json().await?;
        Ok(SignedIn {
            user: token.user,
            access_token: SecretString::from(token.access_token),
            expires_in: token.expires_in.filter(|secs| *secs > 0),
        })
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, ProviderError> {
        let response = self
            .request(reqwest::Method::GET, self.endpoint("auth/v1/user")?)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.json().await?)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(None),
            _ => Err(api_error(response).await),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let mut url = self.endpoint("auth/v1/logout")?;
        url.query_pairs_mut().append_pair("scope", "local");

        let response = self
            .request(reqwest::Method::POST, url)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            // Already gone counts as signed out
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(()),
            _ => Err(api_error(response).await),
        }
    }
}

#[async_trait]
impl RoleDirectory for SupabaseClient {
    async fn fetch_role(
        &self,
        user_id: UserId,
        access_token: &str,
    ) -> Result<UserRole, ProviderError> {
        let mut url = self.endpoint(&format!("rest/v1/{ROLE_TABLE}"))?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{user_id}"))
            .append_pair("select", "role")
            .append_pair("limit", "1");

        let response = self
            .request(reqwest::Method::GET, url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let rows: Vec<RoleRow> = response.json().await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or(ProviderError::RoleNotFound(user_id))?;
        Ok(row.role.parse()?)
    }
}
