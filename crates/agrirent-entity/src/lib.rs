//! # agrirent-entity
//!
//! Domain entities for the booking notification subsystem: bookings and
//! their validation rules, in-app notifications and their typed payloads,
//! push token records, and the read-only equipment and user projections.

pub mod booking;
pub mod equipment;
pub mod notification;
pub mod push_token;
pub mod timestamp;
pub mod user;
