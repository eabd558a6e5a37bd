//! bizdash: terminal administration dashboard for a business REST backend.
//!
//! Categories, locations, suppliers and roles are listed through a shared
//! query cache, created through schema-validated forms, and refreshed by
//! tag-based invalidation after each successful mutation.

pub mod admin_tui;
pub mod api;
pub mod cli;
pub mod config;
pub mod forms;
pub mod models;
pub mod nav;
pub mod query;
pub mod validation;
