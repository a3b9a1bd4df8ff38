//! Shared value types: typed identifiers and raw documents.

pub mod document;
pub mod id;

pub use document::{Document, DocumentChange, collections};
pub use id::{BookingId, EquipmentId, ListingId, NotificationId, UserId};
