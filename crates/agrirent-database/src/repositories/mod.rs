//! Typed repositories over the document store.

pub mod booking;
pub mod equipment;
pub mod notification;
pub mod push_token;
pub mod user;

pub use booking::BookingRepository;
pub use equipment::EquipmentRepository;
pub use notification::NotificationRepository;
pub use push_token::PushTokenRepository;
pub use user::UserRepository;
