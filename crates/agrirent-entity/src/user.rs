//! Read-only projection of a user profile document.

use agrirent_core::types::{Document, UserId};

use crate::equipment::first_non_blank;

/// The parts of a user profile used in notification text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    /// Display name; `None` when the profile has no usable name.
    pub display_name: Option<String>,
}

impl UserProfile {
    /// Project a stored user document. Reads `name`, then `displayName`.
    pub fn from_document(id: &UserId, document: &Document) -> Self {
        Self {
            id: id.clone(),
            display_name: first_non_blank(document, &["name", "displayName"]),
        }
    }
}
