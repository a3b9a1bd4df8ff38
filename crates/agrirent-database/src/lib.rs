//! # agrirent-database
//!
//! Document store backends and typed repositories for the booking
//! notification subsystem.
//!
//! - [`memory::MemoryDocumentStore`]: in-process store with a change feed,
//!   used for local runs and tests.
//! - [`postgres::PgDocumentStore`]: JSONB documents in PostgreSQL with a
//!   `pg_notify` change feed.

pub mod memory;
pub mod migration;
pub mod postgres;
pub mod provider;
pub mod repositories;

pub use memory::MemoryDocumentStore;
pub use provider::connect_store;
