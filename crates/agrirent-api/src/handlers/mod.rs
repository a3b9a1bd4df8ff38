//! Request handlers.

pub mod bookings;
pub mod health;
pub mod notifications;
pub mod push_tokens;
pub mod triggers;
