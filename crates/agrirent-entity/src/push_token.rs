//! Push token record: a user's current push-delivery address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agrirent_core::error::AppError;
use agrirent_core::types::{Document, UserId};

/// The single current push token of a user. Overwritten on every
/// registration; no history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushTokenRecord {
    /// Owner of the token (the document key).
    #[serde(skip)]
    pub user_id: UserId,
    /// Relay delivery address.
    pub token: String,
    /// Registration time.
    #[serde(default, deserialize_with = "crate::timestamp::deserialize_opt")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl PushTokenRecord {
    /// Decode a stored record.
    pub fn from_document(user_id: &UserId, document: &Document) -> Result<Self, AppError> {
        let mut record: Self =
            serde_json::from_value(serde_json::Value::Object(document.clone()))?;
        record.user_id = user_id.clone();
        Ok(record)
    }

    /// Build the stored document for `token` registered at `timestamp`.
    pub fn document(token: &str, timestamp: DateTime<Utc>) -> Document {
        let mut doc = Document::new();
        doc.insert("token".into(), token.into());
        doc.insert("timestamp".into(), timestamp.to_rfc3339().into());
        doc
    }
}
