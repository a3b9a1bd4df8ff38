//! Booking lifecycle configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Status transition policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// `"permissive"` accepts any transition, `"strict"` uses the built-in table.
    #[serde(default = "default_policy")]
    pub transition_policy: String,
    /// Per-status overrides of the allowed next statuses, e.g.
    /// `pending = ["accepted", "rejected", "cancelled"]`.
    #[serde(default)]
    pub allowed_transitions: HashMap<String, Vec<String>>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            transition_policy: default_policy(),
            allowed_transitions: HashMap::new(),
        }
    }
}

fn default_policy() -> String {
    "permissive".to_string()
}
