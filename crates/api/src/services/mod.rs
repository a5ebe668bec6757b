//! Application services.

pub mod dispatch;
pub mod mailer;

pub use dispatch::NotificationDispatcher;
pub use mailer::{MailError, MailTransport, SmtpMailer};
