//! Cached list queries
//!
//! One [`QueryClient`] is shared by every screen. Results are cached per
//! [`crate::models::QueryKey`], requests for the same key are de-duplicated,
//! and successful mutations invalidate by [`crate::models::CacheTag`].

pub mod client;
pub mod state;

pub use client::{FetchResult, QueryClient};
pub use state::{QueryState, QueryStatus};
