//! HTTP adapter for the petclinic visit workflow.
//!
//! Form views are returned as JSON; successful submissions and cancels
//! answer with `303 See Other` to the owner's page.

pub mod http;
pub mod service;

pub use http::router;
pub use service::{ApiError, AppState};
