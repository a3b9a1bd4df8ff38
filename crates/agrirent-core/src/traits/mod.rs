//! Backend seams implemented outside `agrirent-core`.

pub mod claim_store;
pub mod document_store;

pub use claim_store::ClaimStore;
pub use document_store::{ChangeStream, DocumentStore};
