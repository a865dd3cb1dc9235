use anyhow::ensure;
use clap::Subcommand;
use folio_config::Config;
use folio_email_contracts::{Email, EmailService};
use folio_models::email_address::EmailAddressWithName;
use tracing::info;

use crate::environment;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Send a test email, to the sender account if no recipient is given
    Test { recipient: Option<EmailAddressWithName> },
    /// Check that the smtp server is reachable and accepts the credentials
    Ping,
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let email_service = environment::email_service(&config.email)?;

        match self {
            EmailCommand::Test { recipient } => test(&email_service, recipient).await,
            EmailCommand::Ping => {
                email_service.ping().await?;
                info!("smtp server is reachable");
                Ok(())
            }
        }
    }
}

async fn test(
    email_service: &impl EmailService,
    recipient: Option<EmailAddressWithName>,
) -> anyhow::Result<()> {
    let ok = email_service
        .send(Email {
            recipient,
            subject: "Email Deliverability Test".into(),
            body: "Email deliverability seems to be working!".into(),
            reply_to: None,
        })
        .await?;

    ensure!(ok, "Failed to send email");
    info!("test email sent");

    Ok(())
}
