//! REST API access.

mod client;
pub mod endpoints;

pub use client::{ApiClient, CLIENT_USER_AGENT};
