//! Role capabilities and the navigation built from them.
//!
//! The mapping is fixed: administrators see every section, couriers see
//! their deliveries and the routes. Section pages check the same table, so
//! hiding a link and refusing the page can never disagree.

use solid_express_core::UserRole;

/// A dashboard section reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Dashboard,
    Clients,
    Orders,
    Couriers,
    Routes,
    Reports,
}

impl Section {
    /// Every section, in navigation order.
    pub const ALL: [Self; 6] = [
        Self::Dashboard,
        Self::Clients,
        Self::Orders,
        Self::Couriers,
        Self::Routes,
        Self::Reports,
    ];

    /// URL path of the section.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/dashboard",
            Self::Clients => "/clientes",
            Self::Orders => "/pedidos",
            Self::Couriers => "/entregadores",
            Self::Routes => "/rotas",
            Self::Reports => "/relatorios",
        }
    }

    /// Section title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Clients => "Clientes",
            Self::Orders => "Pedidos",
            Self::Couriers => "Entregadores",
            Self::Routes => "Rotas",
            Self::Reports => "Relatórios",
        }
    }

    /// Look a section up by the first path segment (`"rotas"` -> `Routes`).
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|section| section.path().strip_prefix('/') == Some(slug))
    }
}

/// Capability check: may `role` open `section`?
#[must_use]
pub const fn can_access(role: UserRole, section: Section) -> bool {
    match role {
        UserRole::Administrator => true,
        UserRole::Courier => matches!(section, Section::Dashboard | Section::Routes),
    }
}

/// One entry of the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub section: Section,
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Navigation entries visible to `role`, marking `current` as active.
#[must_use]
pub fn links_for(role: UserRole, current: Section) -> Vec<NavLink> {
    Section::ALL
        .into_iter()
        .filter(|section| can_access(role, *section))
        .map(|section| NavLink {
            section,
            href: section.path(),
            label: label_for(role, section),
            active: section == current,
        })
        .collect()
}

/// Couriers see their dashboard as "Minhas Entregas".
const fn label_for(role: UserRole, section: Section) -> &'static str {
    match (role, section) {
        (UserRole::Courier, Section::Dashboard) => "Minhas Entregas",
        _ => section.title(),
    }
}
