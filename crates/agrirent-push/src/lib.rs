//! # agrirent-push
//!
//! Client side of the push relay: message and ticket types, token format
//! checks, batching, and an Expo-compatible HTTP client with timeouts and
//! retry.

pub mod batch;
pub mod error;
pub mod expo;
pub mod message;
pub mod relay;
pub mod token;

pub use batch::{MessageOutcome, send_in_chunks};
pub use error::PushError;
pub use expo::ExpoPushClient;
pub use message::{PushMessage, PushTicket};
pub use relay::PushRelay;
pub use token::is_valid_push_token;
