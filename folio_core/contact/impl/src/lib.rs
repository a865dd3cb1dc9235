use std::{sync::Arc, time::Duration};

use folio_core_contact_contracts::{ContactSendMessageError, ContactService};
use folio_email_contracts::{Email, EmailService};
use folio_models::{contact::ContactSubmission, email_address::EmailAddress};
use folio_shared_contracts::time::TimeService;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Time, Email> {
    time: Time,
    email: Email,
    config: ContactServiceConfig,
}

/// How a valid submission is dispatched.
#[derive(Debug, Clone)]
pub enum ContactServiceConfig {
    /// Record the submission in the server log.
    Log {
        /// Simulated processing time before the submission is acknowledged.
        delay: Duration,
    },
    /// Relay the submission as a notification email.
    Email {
        /// Defaults to the sender account of the mail relay.
        recipient: Option<Arc<EmailAddress>>,
    },
}

impl<Time, Email> ContactServiceImpl<Time, Email> {
    pub fn new(time: Time, email: Email, config: ContactServiceConfig) -> Self {
        Self {
            time,
            email,
            config,
        }
    }
}

impl<Time, EmailS> ContactService for ContactServiceImpl<Time, EmailS>
where
    Time: TimeService,
    EmailS: EmailService,
{
    async fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<(), ContactSendMessageError> {
        match &self.config {
            ContactServiceConfig::Log { delay } => {
                self.log_submission(&submission, *delay).await;
                Ok(())
            }
            ContactServiceConfig::Email { recipient } => {
                self.email_submission(submission, recipient.as_deref())
                    .await
            }
        }
    }
}

impl<Time, EmailS> ContactServiceImpl<Time, EmailS>
where
    Time: TimeService,
    EmailS: EmailService,
{
    async fn log_submission(&self, submission: &ContactSubmission, delay: Duration) {
        let timestamp = self.time.now().to_rfc3339();
        info!(
            name = submission.name.as_str(),
            email = submission.email.as_str(),
            subject = submission.subject.as_str(),
            message = submission.message.as_str(),
            %timestamp,
            "contact form submission"
        );

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    async fn email_submission(
        &self,
        submission: ContactSubmission,
        recipient: Option<&EmailAddress>,
    ) -> Result<(), ContactSendMessageError> {
        let email = notification_email(submission, recipient);

        if !self.email.send(email).await? {
            return Err(ContactSendMessageError::Send);
        }

        Ok(())
    }
}

fn notification_email(submission: ContactSubmission, recipient: Option<&EmailAddress>) -> Email {
    let ContactSubmission {
        name,
        email,
        subject,
        message,
    } = submission;

    Email {
        recipient: recipient.cloned().map(Into::into),
        subject: format!("[Contact Form] {}", *subject),
        body: format!(
            "You have received a new message through the contact form.\n\nName: {}\nEmail: \
             {}\nSubject: {}\n\nMessage:\n{}",
            *name, email, *subject, *message
        ),
        reply_to: Some(email.with_name(name.into_inner())),
    }
}
