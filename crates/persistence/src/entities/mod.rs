//! Database entity definitions (row mappings).

pub mod notification_settings;
pub mod user;

pub use notification_settings::NotificationSettingsEntity;
pub use user::UserEntity;
