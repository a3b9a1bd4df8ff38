//! Raw documents and change events emitted by the document store.

use serde::{Deserialize, Serialize};

/// A schemaless document: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Collection names used by the booking notification subsystem.
pub mod collections {
    /// Booking records.
    pub const BOOKINGS: &str = "bookings";
    /// In-app notification records.
    pub const NOTIFICATIONS: &str = "notifications";
    /// Push token records keyed by user id.
    pub const PUSH_TOKENS: &str = "pushTokens";
    /// Equipment records (read-only here).
    pub const EQUIPMENT: &str = "equipment";
    /// User profile records (read-only here).
    pub const USERS: &str = "users";
}

/// A single write observed on a collection.
///
/// `before` is absent for creations, `after` is absent for deletions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChange {
    /// Collection the document belongs to.
    pub collection: String,
    /// Document identifier.
    pub id: String,
    /// Snapshot before the write.
    pub before: Option<Document>,
    /// Snapshot after the write.
    pub after: Option<Document>,
}
