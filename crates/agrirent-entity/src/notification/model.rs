//! Notification entity model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agrirent_core::error::AppError;
use agrirent_core::types::{Document, NotificationId, UserId};

/// An in-app notification delivered to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Document identifier (not stored inside the document).
    #[serde(skip)]
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Server-assigned creation time.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Whether the recipient has read this notification.
    #[serde(default)]
    pub read: bool,
    /// Flattened payload: event type and related identifiers.
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl Notification {
    /// Decode a stored notification document.
    pub fn from_document(id: &str, document: &Document) -> Result<Self, AppError> {
        let mut notification: Self =
            serde_json::from_value(serde_json::Value::Object(document.clone()))?;
        notification.id = NotificationId::new(id);
        Ok(notification)
    }
}

/// A notification about to be written; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub data: BTreeMap<String, String>,
}

impl NewNotification {
    /// Build the stored document with the given server time and `read = false`.
    pub fn to_document(&self, timestamp: DateTime<Utc>) -> Document {
        let mut doc = Document::new();
        doc.insert("userId".into(), self.user_id.as_str().into());
        doc.insert("title".into(), self.title.clone().into());
        doc.insert("message".into(), self.message.clone().into());
        doc.insert("timestamp".into(), timestamp.to_rfc3339().into());
        doc.insert("read".into(), false.into());
        let data = self
            .data
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        doc.insert("data".into(), serde_json::Value::Object(data));
        doc
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    crate::timestamp::deserialize_opt(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("missing timestamp"))
}
