//! Core types for Solid Express.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{UserId, UserIdError};
pub use role::{ParseRoleError, UserRole};
pub use status::{OrderStatus, RouteStatus};
