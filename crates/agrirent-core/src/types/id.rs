//! Newtype wrappers around opaque document identifiers.
//!
//! Identifiers in the document store are arbitrary strings. Using distinct
//! types prevents accidentally passing a `UserId` where a `BookingId` is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapper around `String`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner string.
            pub fn into_string(self) -> String {
                self.0
            }

            /// Whether the identifier is empty or whitespace.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a booking document.
    BookingId
);

define_id!(
    /// Identifier of a user (renter, owner, or notification recipient).
    UserId
);

define_id!(
    /// Identifier of an equipment document.
    EquipmentId
);

define_id!(
    /// Identifier of a marketplace listing.
    ListingId
);

define_id!(
    /// Identifier of an in-app notification document.
    NotificationId
);
