//! # agrirent-cache
//!
//! Backends for notification claims, the idempotency keys that keep one
//! booking event from being delivered twice:
//!
//! - **memory**: single-process store on [moka](https://crates.io/crates/moka)
//! - **redis**: shared store on the [redis](https://crates.io/crates/redis) crate
//!
//! Both claim atomically; see [`agrirent_core::traits::ClaimStore`].

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::connect_claim_store;
