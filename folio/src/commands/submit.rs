use anyhow::bail;
use clap::Args;
use folio_config::Config;
use folio_core_form_contracts::{ContactFormService, ContactFormSubmitError};
use folio_models::contact::ContactForm;
use url::Url;

use crate::environment;

#[derive(Debug, Args)]
pub struct SubmitCommand {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    subject: String,
    #[arg(long)]
    message: String,
    /// Base url of the site, overrides `client.api_url`
    #[arg(long)]
    api_url: Option<Url>,
}

impl SubmitCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let service = environment::contact_form_service(&config, self.api_url.as_ref())?;

        let form = ContactForm {
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
        };

        let message = submit(&service, form).await?;
        println!("{message}");

        Ok(())
    }
}

async fn submit(service: &impl ContactFormService, form: ContactForm) -> anyhow::Result<String> {
    match service.submit(form).await {
        Ok(message) => Ok(message),
        Err(ContactFormSubmitError::Invalid(errors)) => {
            for (field, messages) in &errors.field_errors {
                for message in messages {
                    eprintln!("{field}: {message}");
                }
            }
            bail!("Invalid form data")
        }
        Err(err) => Err(err.into()),
    }
}
