//! Dashboard and section page handlers.
//!
//! Both pages sit behind the session gate ([`RequireSession`]); nothing here
//! runs, and no card is rendered, until the user's role is known.

use askama::Template;
use axum::{
    extract::Path,
    response::{Html, Redirect},
};
use tracing::instrument;

use solid_express_core::{OrderStatus, RouteStatus, UserRole};

use crate::error::AppError;
use crate::gate::{RequireSession, SessionUser};
use crate::middleware::DASHBOARD_PATH;
use crate::navigation::{NavLink, Section, can_access, links_for};

const SUBTITLE: &str = "Bem-vindo ao sistema Solid Express - Aracaju/SE";

/// Neighbourhoods covered by today's routes.
const ROUTE_AREAS: [&str; 4] = ["Atalaia", "Farolândia", "Jardins", "Grageru"];

// =============================================================================
// View Types
// =============================================================================

/// Signed-in user as shown in the navigation bar.
#[derive(Debug, Clone)]
pub struct UserView {
    pub email: String,
    pub role_label: &'static str,
}

impl From<&SessionUser> for UserView {
    fn from(user: &SessionUser) -> Self {
        Self {
            email: user.email.clone().unwrap_or_default(),
            role_label: user.role.label(),
        }
    }
}

/// Headline figure on the dashboard.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub title: &'static str,
    pub value: u32,
    pub change: &'static str,
}

/// Entry of the recent-activity list.
#[derive(Debug, Clone)]
pub struct ActivityView {
    pub title: String,
    pub detail: String,
    pub time_ago: String,
}

/// Entry of the routes-of-the-day list.
#[derive(Debug, Clone)]
pub struct RouteView {
    pub area: &'static str,
    pub deliveries: usize,
    pub status: &'static str,
}

// =============================================================================
// Templates
// =============================================================================

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub user: UserView,
    pub nav: Vec<NavLink>,
    pub heading: &'static str,
    pub subtitle: &'static str,
    pub today: String,
    pub stats: Vec<StatCard>,
    pub activity: Vec<ActivityView>,
    pub routes: Vec<RouteView>,
}

/// Placeholder page for a navigation section.
#[derive(Template)]
#[template(path = "dashboard/section.html")]
pub struct SectionTemplate {
    pub user: UserView,
    pub nav: Vec<NavLink>,
    pub heading: &'static str,
}

// =============================================================================
// Demo Data
// =============================================================================

/// Dashboard title for a role.
#[must_use]
pub const fn heading_for(role: UserRole) -> &'static str {
    match role {
        UserRole::Administrator => "Dashboard Administrativo",
        UserRole::Courier => "Minhas Entregas",
    }
}

fn stat_cards() -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Pedidos Hoje",
            value: 24,
            change: "+12%",
        },
        StatCard {
            title: "Em Entrega",
            value: 8,
            change: "+5%",
        },
        StatCard {
            title: "Entregadores Ativos",
            value: 12,
            change: "+2",
        },
        StatCard {
            title: "Rotas Ativas",
            value: 5,
            change: "+1",
        },
    ]
}

fn recent_activity() -> Vec<ActivityView> {
    let status = OrderStatus::EmEntrega.label();
    (1..=4)
        .map(|i| ActivityView {
            title: format!("Pedido #00{i} atualizado"),
            detail: format!("Status: {status} - Bairro Atalaia"),
            time_ago: format!("há {i}h"),
        })
        .collect()
}

fn routes_of_the_day() -> Vec<RouteView> {
    ROUTE_AREAS
        .into_iter()
        .enumerate()
        .map(|(i, area)| RouteView {
            area,
            deliveries: i + 3,
            status: RouteStatus::EmAndamento.label(),
        })
        .collect()
}

// =============================================================================
// Routes
// =============================================================================

/// Site root.
///
/// GET /
pub async fn root() -> Redirect {
    Redirect::to(DASHBOARD_PATH)
}

/// Dashboard page.
///
/// GET /dashboard
///
/// # Errors
///
/// `Internal` when the template fails to render.
#[instrument(skip_all, fields(user_id = %user.id, role = %user.role))]
pub async fn index(RequireSession(user): RequireSession) -> Result<Html<String>, AppError> {
    let template = DashboardTemplate {
        nav: links_for(user.role, Section::Dashboard),
        heading: heading_for(user.role),
        user: UserView::from(&user),
        subtitle: SUBTITLE,
        today: chrono::Local::now().format("%d/%m/%Y").to_string(),
        stats: stat_cards(),
        activity: recent_activity(),
        routes: routes_of_the_day(),
    };
    Ok(Html(template.render()?))
}

/// Section placeholder page.
///
/// GET /{section}
///
/// # Errors
///
/// `NotFound` for an unknown section, `Forbidden` when the role lacks it,
/// `Internal` when the template fails to render.
#[instrument(skip_all, fields(user_id = %user.id, slug = %slug))]
pub async fn section(
    RequireSession(user): RequireSession,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let section = Section::from_slug(&slug).ok_or_else(|| AppError::NotFound(format!("/{slug}")))?;

    if !can_access(user.role, section) {
        tracing::info!(role = %user.role, path = section.path(), "section refused for role");
        return Err(AppError::Forbidden(section.path().to_owned()));
    }

    let template = SectionTemplate {
        nav: links_for(user.role, section),
        heading: section.title(),
        user: UserView::from(&user),
    };
    Ok(Html(template.render()?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::DashboardConfig;
    use crate::provider::testing::FakeBackend;
    use crate::state::AppState;

    fn app(backend: &Arc<FakeBackend>) -> Router {
        let state = AppState::new(
            DashboardConfig::for_tests("http://localhost:54321"),
            backend.clone(),
            backend.clone(),
        );
        crate::routes::app(state)
    }

    async fn get(backend: &Arc<FakeBackend>, path: &str, token: Option<&str>) -> Response {
        let mut request = Request::get(path);
        if let Some(token) = token {
            request = request.header(header::COOKIE, format!("sb-access-token={token}"));
        }
        app(backend)
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_root_redirects_to_dashboard() {
        let backend = Arc::new(FakeBackend::with_role(UserRole::Administrator));
        let response = get(&backend, "/", None).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard");
    }

    #[tokio::test]
    async fn test_administrator_dashboard() {
        let backend = Arc::new(FakeBackend::with_role(UserRole::Administrator));
        let response = get(&backend, "/dashboard", Some("valid-token")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Dashboard Administrativo"));
        assert!(body.contains("Pedidos Hoje"));
        assert!(body.contains(r#"href="/relatorios""#));
        assert!(body.contains("Farolândia"));
    }

    #[tokio::test]
    async fn test_courier_dashboard_hides_admin_sections() {
        let backend = Arc::new(FakeBackend::with_role(UserRole::Courier));
        let response = get(&backend, "/dashboard", Some("valid-token")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Minhas Entregas"));
        assert!(body.contains(r#"href="/rotas""#));
        assert!(!body.contains(r#"href="/clientes""#));
        assert!(!body.contains("Dashboard Administrativo"));
    }

    #[tokio::test]
    async fn test_unknown_user_is_sent_to_login_before_rendering() {
        let backend = Arc::new(FakeBackend::with_role(UserRole::Administrator));
        let response = get(&backend, "/dashboard", Some("expired-token")).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));
        assert_eq!(backend.get_user_calls(), 1);
        assert_eq!(backend.role_calls(), 0);
        assert!(!body_text(response).await.contains("Pedidos Hoje"));
    }

    #[tokio::test]
    async fn test_role_lookup_failure_is_sent_to_login() {
        let mut backend = FakeBackend::with_role(UserRole::Administrator);
        backend.role_lookup_fails = true;
        let backend = Arc::new(backend);
        let response = get(&backend, "/dashboard", Some("valid-token")).await;

        assert_eq!(response.headers()[header::LOCATION], "/login");
        assert!(!body_text(response).await.contains("Dashboard Administrativo"));
    }

    #[tokio::test]
    async fn test_section_capabilities() {
        let backend = Arc::new(FakeBackend::with_role(UserRole::Courier));

        let response = get(&backend, "/rotas", Some("valid-token")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Rotas"));

        let response = get(&backend, "/clientes", Some("valid-token")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = get(&backend, "/financeiro", Some("valid-token")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_section_requires_session() {
        let backend = Arc::new(FakeBackend::with_role(UserRole::Administrator));
        let response = get(&backend, "/pedidos", Some("forged")).await;

        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[test]
    fn test_demo_data() {
        let routes = routes_of_the_day();
        assert_eq!(routes.len(), 4);
        assert_eq!(routes[0].deliveries, 3);
        assert_eq!(routes[3].deliveries, 6);
        assert!(routes.iter().all(|r| r.status == "Ativa"));
        assert_eq!(recent_activity()[1].time_ago, "há 2h");
    }
}
