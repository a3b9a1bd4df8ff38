//! Classification of a booking write into a lifecycle event.

use serde_json::Value;

use agrirent_core::types::Document;

/// What a single booking write means for notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent<'a> {
    /// The booking no longer exists.
    Deleted,
    /// The booking was just created.
    Created { after: &'a Document },
    /// The status field changed.
    StatusChanged {
        old: Option<String>,
        new: Option<String>,
        after: &'a Document,
    },
    /// Something other than the status changed (including flag writes).
    NoOp,
}

impl ChangeEvent<'_> {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::Created { .. } => "created",
            Self::StatusChanged { .. } => "status_changed",
            Self::NoOp => "noop",
        }
    }
}

/// Classify a write from its before/after snapshots.
///
/// Only the raw `status` value is compared, so unrelated fields never turn
/// a write into an event and an unparseable status still classifies.
pub fn classify<'a>(before: Option<&'a Document>, after: Option<&'a Document>) -> ChangeEvent<'a> {
    match (before, after) {
        (_, None) => ChangeEvent::Deleted,
        (None, Some(after)) => ChangeEvent::Created { after },
        (Some(before), Some(after)) => {
            let old = status_text(before);
            let new = status_text(after);
            if old == new {
                ChangeEvent::NoOp
            } else {
                ChangeEvent::StatusChanged { old, new, after }
            }
        }
    }
}

/// The status as text; non-string values use their JSON rendering.
fn status_text(document: &Document) -> Option<String> {
    match document.get("status") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}
