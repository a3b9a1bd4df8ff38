//! Read-only projection of an equipment document.

use agrirent_core::types::{Document, EquipmentId};

/// The parts of an equipment record used in notification text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equipment {
    pub id: EquipmentId,
    /// Display name; `None` when the record has no usable name.
    pub name: Option<String>,
}

impl Equipment {
    /// Project a stored equipment document. Reads `name`, then `title`.
    pub fn from_document(id: &EquipmentId, document: &Document) -> Self {
        Self {
            id: id.clone(),
            name: first_non_blank(document, &["name", "title"]),
        }
    }
}

pub(crate) fn first_non_blank(document: &Document, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|f| document.get(*f).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
