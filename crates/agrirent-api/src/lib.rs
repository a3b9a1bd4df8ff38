//! # agrirent-api
//!
//! HTTP API layer for AgriRent built on Axum.
//!
//! Exposes the push-token and custom-notification callables, the caller's
//! notification inbox, booking creation and status updates, and the
//! booking trigger webhook. Errors are mapped to `{error, message}` bodies
//! with callable-style codes.

pub mod auth;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
