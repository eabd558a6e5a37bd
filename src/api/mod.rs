//! REST backend access
//!
//! `ApiClient` is the reqwest implementation of [`RemoteApi`]; the query
//! layer only ever talks to the trait so it can be exercised without a server.

pub mod client;
pub mod errors;

pub use client::{decode_list, ApiClient, RemoteApi};
pub use errors::ApiError;
