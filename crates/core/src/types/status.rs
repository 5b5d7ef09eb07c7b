//! Delivery status enums.
//!
//! Orders and routes have no lifecycle logic in the dashboard yet; these
//! enums only label what the activity feed displays.

use serde::{Deserialize, Serialize};

/// Order delivery status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pendente,
    EmRota,
    EmEntrega,
    Entregue,
    Cancelado,
}

impl OrderStatus {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pendente => "Pendente",
            Self::EmRota => "Em rota",
            Self::EmEntrega => "Em entrega",
            Self::Entregue => "Entregue",
            Self::Cancelado => "Cancelado",
        }
    }

    /// Whether the order has left the depot and not yet finished.
    #[must_use]
    pub const fn is_in_transit(self) -> bool {
        matches!(self, Self::EmRota | Self::EmEntrega)
    }
}

/// Delivery route status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    #[default]
    Planejada,
    EmAndamento,
    Concluida,
}

impl RouteStatus {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planejada => "Planejada",
            Self::EmAndamento => "Ativa",
            Self::Concluida => "Concluída",
        }
    }
}
