//! Ticket email delivery.
//!
//! In development the rendered ticket is written to the log instead of being
//! sent. In production it goes out over SMTP with STARTTLS.

mod template;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::{AppEnv, Config, SmtpConfig};

pub use template::TicketEmail;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("failed to build email: {0}")]
    Build(String),
    #[error("SMTP error: {0}")]
    Transport(String),
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, EmailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| EmailError::Transport(format!("SMTP relay error: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: parse_mailbox(&config.from_email)?,
        })
    }

    async fn send(&self, to: &str, ticket: &TicketEmail) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(to)?)
            .subject(ticket.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                ticket.text.clone(),
                ticket.html.clone(),
            ))
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        tracing::info!(to = %to, subject = %ticket.subject, "Ticket email sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address.parse().map_err(|e| EmailError::InvalidAddress {
        address: address.to_string(),
        reason: format!("{e}"),
    })
}

#[derive(Clone)]
pub enum Mailer {
    /// Logs the plain-text ticket instead of sending it.
    Log,
    Smtp(SmtpMailer),
}

impl Mailer {
    pub fn from_config(config: &Config) -> Result<Self, EmailError> {
        match config.app_env {
            AppEnv::Development => Ok(Mailer::Log),
            AppEnv::Production => SmtpMailer::new(&config.smtp).map(Mailer::Smtp),
        }
    }

    /// Delivers the ticket once. Failures are returned, never retried.
    pub async fn send(&self, to: &str, ticket: &TicketEmail) -> Result<(), EmailError> {
        match self {
            Mailer::Log => {
                parse_mailbox(to)?;
                tracing::info!(
                    to = %to,
                    subject = %ticket.subject,
                    "=== EMAIL TICKET ===\n{}\n===================",
                    ticket.text
                );
                Ok(())
            }
            Mailer::Smtp(smtp) => smtp.send(to, ticket).await,
        }
    }
}
