//! Booking status transition policy.
//!
//! The mobile client historically allowed any status to overwrite any
//! other. The policy makes the allowed set explicit: `Permissive` keeps the
//! historical behaviour, `Table` restricts transitions to a configured map.

use std::collections::{HashMap, HashSet};

use agrirent_core::config::BookingConfig;
use agrirent_core::error::AppError;

use super::status::BookingStatus;

/// A transition rejected by the policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transition {from} -> {to} is not allowed")]
pub struct TransitionError {
    pub from: BookingStatus,
    pub to: BookingStatus,
}

/// Allowed status transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any status may follow any other.
    Permissive,
    /// Only listed transitions are allowed. Statuses absent from the map
    /// allow nothing.
    Table(HashMap<BookingStatus, HashSet<BookingStatus>>),
}

impl TransitionPolicy {
    /// The built-in strict table.
    pub fn strict() -> Self {
        let mut table = HashMap::new();
        table.insert(
            BookingStatus::Pending,
            HashSet::from([
                BookingStatus::Accepted,
                BookingStatus::Rejected,
                BookingStatus::Cancelled,
            ]),
        );
        table.insert(
            BookingStatus::Accepted,
            HashSet::from([BookingStatus::Completed, BookingStatus::Cancelled]),
        );
        Self::Table(table)
    }

    /// Build the policy from configuration.
    ///
    /// `allowed_transitions` overrides individual rows of the strict table and
    /// is rejected in permissive mode, where it would silently do nothing.
    pub fn from_config(config: &BookingConfig) -> Result<Self, AppError> {
        match config.transition_policy.as_str() {
            "permissive" => {
                if !config.allowed_transitions.is_empty() {
                    return Err(AppError::configuration(
                        "booking.allowed_transitions requires transition_policy = \"strict\"",
                    ));
                }
                Ok(Self::Permissive)
            }
            "strict" => {
                let mut policy = Self::strict();
                if let Self::Table(table) = &mut policy {
                    for (from, targets) in &config.allowed_transitions {
                        let from = parse_status(from)?;
                        let targets = targets
                            .iter()
                            .map(|t| parse_status(t))
                            .collect::<Result<HashSet<_>, _>>()?;
                        table.insert(from, targets);
                    }
                }
                Ok(policy)
            }
            other => Err(AppError::configuration(format!(
                "Unknown booking.transition_policy '{other}'. Supported: permissive, strict"
            ))),
        }
    }

    /// Whether moving from `from` to `to` is allowed. Re-writing the same
    /// status is never a transition and is always allowed.
    pub fn allows(&self, from: BookingStatus, to: BookingStatus) -> bool {
        if from == to {
            return true;
        }
        match self {
            Self::Permissive => true,
            Self::Table(table) => table.get(&from).is_some_and(|next| next.contains(&to)),
        }
    }

    /// Like [`Self::allows`] but returns the rejected transition as an error.
    pub fn check(&self, from: BookingStatus, to: BookingStatus) -> Result<(), TransitionError> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(TransitionError { from, to })
        }
    }
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::Permissive
    }
}

fn parse_status(s: &str) -> Result<BookingStatus, AppError> {
    s.parse()
        .map_err(|e| AppError::configuration(format!("booking.allowed_transitions: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn test_permissive_allows_everything() {
        let policy = TransitionPolicy::Permissive;
        assert!(policy.allows(Completed, Pending));
        assert!(policy.allows(Cancelled, Accepted));
    }

    #[test]
    fn test_strict_table() {
        let policy = TransitionPolicy::strict();
        assert!(policy.allows(Pending, Accepted));
        assert!(policy.allows(Accepted, Cancelled));
        assert!(policy.allows(Rejected, Rejected));
        assert_eq!(
            policy.check(Completed, Pending),
            Err(TransitionError {
                from: Completed,
                to: Pending
            })
        );
        assert!(!policy.allows(Pending, Completed));
    }

    #[test]
    fn test_config_overrides_rows() {
        let config = BookingConfig {
            transition_policy: "strict".into(),
            allowed_transitions: HashMap::from([(
                "pending".to_string(),
                vec!["accepted".to_string(), "completed".to_string()],
            )]),
        };
        let policy = TransitionPolicy::from_config(&config).unwrap();
        assert!(policy.allows(Pending, Completed));
        assert!(!policy.allows(Pending, Rejected));
        assert!(policy.allows(Accepted, Completed));
    }

    #[test]
    fn test_config_errors() {
        let bad_mode = BookingConfig {
            transition_policy: "lenient".into(),
            allowed_transitions: HashMap::new(),
        };
        assert!(TransitionPolicy::from_config(&bad_mode).is_err());

        let bad_status = BookingConfig {
            transition_policy: "strict".into(),
            allowed_transitions: HashMap::from([("pending".to_string(), vec!["done".to_string()])]),
        };
        assert!(TransitionPolicy::from_config(&bad_status).is_err());

        let overrides_without_strict = BookingConfig {
            transition_policy: "permissive".into(),
            allowed_transitions: HashMap::from([("pending".to_string(), vec![])]),
        };
        assert!(TransitionPolicy::from_config(&overrides_without_strict).is_err());
    }
}
