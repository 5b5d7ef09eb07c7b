//! Login and logout handlers.
//!
//! Password sign-in goes to the identity provider. A successful sign-in is
//! only kept when the stored role matches the role picked on the login page;
//! otherwise the fresh session is ended on the spot and the page shows a
//! denial. Every failure re-renders the login page in place.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use solid_express_core::{Email, UserRole};

use crate::config::DashboardConfig;
use crate::gate::expire_session_cookie;
use crate::middleware::{DASHBOARD_PATH, LOGIN_PATH};
use crate::provider::{IdentityProvider, ProviderError};
use crate::state::AppState;

// =============================================================================
// Messages
// =============================================================================

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Email ou senha incorretos";
pub const EMAIL_NOT_CONFIRMED_MESSAGE: &str = "Por favor, confirme seu email antes de fazer login";
pub const GENERIC_FAILURE_MESSAGE: &str = "Erro ao fazer login. Tente novamente.";
pub const ACCESS_DENIED_MESSAGE: &str = "Acesso negado para este tipo de conta";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Account type picked on the page.
    pub role: UserRole,
}

// =============================================================================
// Templates
// =============================================================================

/// One radio button of the account-type chooser.
#[derive(Debug, Clone)]
pub struct RoleOption {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
    pub email: String,
    pub roles: Vec<RoleOption>,
}

impl LoginTemplate {
    fn new(email: String, selected: UserRole, error: Option<&'static str>) -> Self {
        let roles = UserRole::ALL
            .into_iter()
            .map(|role| RoleOption {
                value: role.as_str(),
                label: role.label(),
                checked: role == selected,
            })
            .collect();
        Self {
            error,
            email,
            roles,
        }
    }
}

/// Re-render the login page with `message`, keeping what the user typed
/// (except the password).
fn login_failure(
    status: StatusCode,
    email: String,
    role: UserRole,
    message: &'static str,
) -> Response {
    (status, LoginTemplate::new(email, role, Some(message))).into_response()
}

/// Map a sign-in failure to a status and the message shown to the user.
const fn sign_in_failure(err: &ProviderError) -> (StatusCode, &'static str) {
    match err {
        ProviderError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS_MESSAGE)
        }
        ProviderError::EmailNotConfirmed => (StatusCode::FORBIDDEN, EMAIL_NOT_CONFIRMED_MESSAGE),
        _ => (StatusCode::BAD_GATEWAY, GENERIC_FAILURE_MESSAGE),
    }
}

/// Build the session-token cookie for a fresh sign-in.
///
/// Without a provider expiry the cookie lives for the browser session.
fn session_cookie(
    config: &DashboardConfig,
    access_token: &str,
    expires_in: Option<u64>,
) -> Cookie<'static> {
    let mut cookie = Cookie::build((config.session_cookie_name.clone(), access_token.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.is_secure());
    if let Some(secs) = expires_in {
        cookie = cookie.max_age(time::Duration::seconds(
            i64::try_from(secs).unwrap_or(i64::MAX),
        ));
    }
    cookie.build()
}

/// End a provider session, logging instead of failing.
async fn end_session(identity: &dyn IdentityProvider, access_token: &str) {
    if let Err(e) = identity.sign_out(access_token).await {
        tracing::warn!(error = %e, "provider sign-out failed");
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// GET /login
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate::new(String::new(), UserRole::Administrator, None)
}

/// Handle login form submission.
///
/// POST /login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "login: unreadable form");
            return login_failure(
                StatusCode::BAD_REQUEST,
                String::new(),
                UserRole::Administrator,
                GENERIC_FAILURE_MESSAGE,
            );
        }
    };
    let LoginForm {
        email,
        password,
        role: claimed,
    } = form;
    let password = SecretString::from(password);

    let Ok(address) = Email::parse(&email) else {
        return login_failure(
            StatusCode::UNAUTHORIZED,
            email,
            claimed,
            INVALID_CREDENTIALS_MESSAGE,
        );
    };

    let signed_in = match state
        .identity()
        .sign_in_with_password(&address, &password)
        .await
    {
        Ok(signed_in) => signed_in,
        Err(e) => {
            tracing::warn!(error = %e, "login: sign-in rejected");
            let (status, message) = sign_in_failure(&e);
            return login_failure(status, email, claimed, message);
        }
    };

    let token = signed_in.access_token.expose_secret();
    let user_id = signed_in.user.id;

    match state.roles().fetch_role(user_id, token).await {
        Ok(stored) if stored == claimed => {}
        Ok(stored) => {
            tracing::warn!(%user_id, %stored, "login: account type mismatch");
            end_session(state.identity(), token).await;
            return login_failure(StatusCode::FORBIDDEN, email, claimed, ACCESS_DENIED_MESSAGE);
        }
        Err(e) => {
            tracing::warn!(%user_id, error = %e, "login: role lookup failed");
            end_session(state.identity(), token).await;
            return login_failure(
                StatusCode::BAD_GATEWAY,
                email,
                claimed,
                GENERIC_FAILURE_MESSAGE,
            );
        }
    }

    tracing::info!(%user_id, role = %claimed, "login succeeded");
    let cookie = session_cookie(state.config(), token, signed_in.expires_in);
    (jar.add(cookie), Redirect::to(DASHBOARD_PATH)).into_response()
}

// =============================================================================
// Logout Route
// =============================================================================

/// End the session and return to the login page.
///
/// POST /logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let cookie_name = state.session_cookie_name();
    let token = jar
        .get(cookie_name)
        .map(|c| c.value().to_owned())
        .filter(|t| !t.is_empty());

    if let Some(token) = token {
        end_session(state.identity(), &token).await;
    }

    (
        expire_session_cookie(jar, cookie_name),
        Redirect::to(LOGIN_PATH),
    )
        .into_response()
}
