//! Notification domain entities.

pub mod model;
pub mod payload;

pub use model::{NewNotification, Notification};
pub use payload::{NotificationPayload, NotificationType};
