//! User role as stored in the hosted user-role table.

use serde::{Deserialize, Serialize};

/// Error returned when a role string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid user role: {0}")]
pub struct ParseRoleError(String);

/// Account type of a dashboard user.
///
/// The role column stores `admin` and `entregador`; `courier` is accepted
/// when reading so English-speaking tooling can write rows too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Full access: clients, orders, couriers, routes and reports.
    #[serde(rename = "admin")]
    Administrator,
    /// Restricted access: own deliveries and routes.
    #[serde(rename = "entregador", alias = "courier")]
    Courier,
}

impl UserRole {
    /// Every role, in chooser order.
    pub const ALL: [Self; 2] = [Self::Administrator, Self::Courier];

    /// Value stored in the role table and submitted by the login chooser.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "admin",
            Self::Courier => "entregador",
        }
    }

    /// Human-readable label shown in the UI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Administrator => "Administrador",
            Self::Courier => "Entregador",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Administrator),
            "entregador" | "courier" => Ok(Self::Courier),
            _ => Err(ParseRoleError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_table_values_and_alias() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Administrator);
        assert_eq!("entregador".parse::<UserRole>().unwrap(), UserRole::Courier);
        assert_eq!("courier".parse::<UserRole>().unwrap(), UserRole::Courier);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "superadmin".parse::<UserRole>().unwrap_err();
        assert_eq!(err.to_string(), "invalid user role: superadmin");
        assert!("Admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_deserialize_role_row_values() {
        let role: UserRole = serde_json::from_str("\"entregador\"").unwrap();
        assert_eq!(role, UserRole::Courier);
        let role: UserRole = serde_json::from_str("\"courier\"").unwrap();
        assert_eq!(role, UserRole::Courier);
        assert_eq!(
            serde_json::to_string(&UserRole::Administrator).unwrap(),
            "\"admin\""
        );
    }
}
