use std::sync::Arc;

use anyhow::{anyhow, Context};
use folio_email_contracts::{Email, EmailService};
use folio_utils::Apply;
use lettre::{
    message::{header, Mailbox, MessageBuilder},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

/// Sends emails through an smtp relay.
///
/// The sender account and its access credential are looked up in the process
/// environment on every send, so missing or rotated credentials only surface
/// when an email is actually sent.
#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    config: Arc<EmailServiceConfig>,
}

#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    pub smtp_url: String,
    pub username_env: String,
    pub password_env: String,
}

impl EmailServiceImpl {
    pub fn new(config: EmailServiceConfig) -> anyhow::Result<Self> {
        AsyncSmtpTransport::<Tokio1Executor>::from_url(&config.smtp_url)
            .with_context(|| format!("Invalid smtp url {:?}", config.smtp_url))?;

        Ok(Self {
            config: config.into(),
        })
    }

    fn sender(&self) -> anyhow::Result<(Address, Credentials)> {
        let username = read_env(&self.config.username_env)?;
        let password = read_env(&self.config.password_env)?;
        let sender = username
            .parse::<Address>()
            .context("The sender account is not a valid email address")?;

        Ok((sender, Credentials::new(username, password)))
    }

    fn transport(
        &self,
        credentials: Credentials,
    ) -> anyhow::Result<AsyncSmtpTransport<Tokio1Executor>> {
        Ok(AsyncSmtpTransport::<Tokio1Executor>::from_url(&self.config.smtp_url)?
            .credentials(credentials)
            .build())
    }
}

fn read_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("Failed to read environment variable {name}"))
}

fn build_message(sender: Address, email: Email) -> anyhow::Result<Message> {
    let sender = Mailbox::new(None, sender);
    let recipient = email.recipient.map(|x| x.0).unwrap_or_else(|| sender.clone());

    Message::builder()
        .from(sender)
        .to(recipient)
        .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
        .subject(email.subject)
        .header(header::ContentType::TEXT_PLAIN)
        .body(email.body)
        .map_err(Into::into)
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let (sender, credentials) = self.sender()?;
        let message = build_message(sender, email)?;

        debug!(envelope = ?message.envelope(), "sending email");

        self.transport(credentials)?
            .send(message)
            .await
            .map(|response| response.is_positive())
            .map_err(Into::into)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let (_, credentials) = self.sender()?;
        self.transport(credentials)?
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}
