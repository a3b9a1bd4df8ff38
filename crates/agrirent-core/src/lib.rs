//! # agrirent-core
//!
//! Core crate for the AgriRent booking notification backend. Contains
//! configuration schemas, typed identifiers, the document store and claim
//! store traits, document change events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AgriRent crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
