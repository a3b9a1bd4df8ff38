//! Booking domain entities.

pub mod model;
pub mod policy;
pub mod status;
pub mod validation;

pub use model::{Booking, BookingSnapshot, NotificationFlag};
pub use policy::{TransitionError, TransitionPolicy};
pub use status::BookingStatus;
pub use validation::{ValidationError, validate};
