//! Key builders for idempotency claims.
//!
//! Backends apply their own namespace (for Redis, `cache.redis.namespace`).

/// Claim key for the creation notification of a booking.
pub fn notification_created(booking_id: &str) -> String {
    format!("notify:{booking_id}:created")
}

/// Claim key for one status transition of a booking.
pub fn notification_status_change(booking_id: &str, old: &str, new: &str) -> String {
    format!("notify:{booking_id}:status:{old}->{new}")
}
