//! Solid Express dashboard library.
//!
//! Role-gated delivery dashboard for administrators and couriers. Identity
//! and the user-role table live in a hosted backend; this crate only guards
//! routes, resolves roles and renders pages.
//!
//! # Request path
//!
//! 1. [`middleware::guard`] redirects on cookie presence alone.
//! 2. [`gate`] confirms the user and role with the backend on every page.
//! 3. [`routes`] render role-specific pages from [`navigation`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod navigation;
pub mod provider;
pub mod routes;
pub mod state;
