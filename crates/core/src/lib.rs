//! Solid Express Core - Shared domain types.
//!
//! Types used by the delivery dashboard and anything else that talks to the
//! hosted auth/table backend:
//! - [`Email`] - validated login address
//! - [`UserId`] - provider-issued user identifier
//! - [`UserRole`] - administrator or courier, as stored in the role table
//! - [`OrderStatus`] / [`RouteStatus`] - delivery status labels
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The
//! dashboard crate owns every call to the external provider.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
