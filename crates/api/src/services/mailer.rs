//! SMTP email transport.
//!
//! One message per notification, addressed to every recipient. The
//! transport is optional: when SMTP is not configured the service runs
//! with delivery disabled.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

/// Errors from building or sending an email.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("no valid recipient addresses")]
    NoRecipients,
}

/// Sends a single plain-text email to a list of recipients.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &[String], subject: &str, body: &str) -> Result<(), MailError>;
}

/// lettre-backed SMTP mailer using STARTTLS submission.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer from configuration. Returns `Ok(None)` when SMTP is
    /// not configured, which disables delivery rather than failing startup.
    pub fn from_config(config: &SmtpConfig) -> Result<Option<Self>, MailError> {
        if !config.is_configured() {
            return Ok(None);
        }

        let from: Mailbox = config.sender().parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Some(Self { transport, from }))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, to: &[String], subject: &str, body: &str) -> Result<(), MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);

        let mut valid = 0;
        for address in to {
            match address.parse::<Mailbox>() {
                Ok(mailbox) => {
                    builder = builder.to(mailbox);
                    valid += 1;
                }
                Err(error) => {
                    tracing::warn!(address, %error, "skipping unparseable recipient address");
                }
            }
        }
        if valid == 0 {
            return Err(MailError::NoRecipients);
        }

        let message = builder.body(body.to_string())?;
        self.transport.send(message).await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_smtp_yields_no_mailer() {
        let config = SmtpConfig::default();
        let mailer = SmtpMailer::from_config(&config).expect("config should not error");
        assert!(mailer.is_none());
    }

    #[test]
    fn configured_smtp_builds_a_mailer() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "mailer@example.com".to_string(),
            password: "secret".to_string(),
            from: String::new(),
        };
        let mailer = SmtpMailer::from_config(&config).expect("config should parse");
        assert!(mailer.is_some());
    }

    #[test]
    fn invalid_sender_address_is_an_error() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "not an address".to_string(),
            password: "secret".to_string(),
            from: String::new(),
        };
        assert!(SmtpMailer::from_config(&config).is_err());
    }
}
