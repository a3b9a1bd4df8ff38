//! In-memory claim store.

pub mod store;

pub use store::MemoryClaimStore;
