//! PostgreSQL-backed document store.

pub mod connection;
pub mod store;

pub use connection::connect_pool;
pub use store::PgDocumentStore;
