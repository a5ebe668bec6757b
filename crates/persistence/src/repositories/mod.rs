//! Repository implementations.

pub mod notification_settings;
pub mod user;

pub use notification_settings::NotificationSettingsRepository;
pub use user::UserRepository;
