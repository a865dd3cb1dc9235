use std::sync::Arc;

use anyhow::Context;
use folio_extern_contracts::contact::ContactApiService;
use folio_models::contact::ContactSubmission;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::http::HttpClient;

const CONTACT_ENDPOINT: &str = "api/contact";

/// Shown when the endpoint accepts the submission without a message of its own.
pub const DEFAULT_CONFIRMATION: &str = "Message sent successfully!";

#[derive(Debug, Clone)]
pub struct ContactApiServiceImpl {
    config: ContactApiServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ContactApiServiceConfig {
    endpoint: Arc<Url>,
}

impl ContactApiServiceConfig {
    /// `api_url` is the base url of the site serving the contact endpoint.
    pub fn new(api_url: &Url) -> anyhow::Result<Self> {
        let endpoint = api_url
            .join(CONTACT_ENDPOINT)
            .with_context(|| format!("Invalid api url {api_url}"))?;

        Ok(Self {
            endpoint: endpoint.into(),
        })
    }
}

impl ContactApiServiceImpl {
    pub fn new(config: ContactApiServiceConfig) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            client: HttpClient::new()?,
        })
    }
}

impl ContactApiService for ContactApiServiceImpl {
    async fn submit(&self, submission: &ContactSubmission) -> anyhow::Result<String> {
        debug!(endpoint = %self.config.endpoint, "submitting contact form");

        let response = self
            .client
            .post((*self.config.endpoint).clone())
            .json(submission)
            .send()
            .await?
            .error_for_status()?;

        // any 2xx is an accepted submission, the body is only a courtesy
        let message = match response.json::<SubmitResponse>().await {
            Ok(SubmitResponse { message }) => message,
            Err(err) => {
                debug!("contact endpoint sent no confirmation message: {err}");
                DEFAULT_CONFIRMATION.into()
            }
        };

        Ok(message)
    }
}

#[derive(Deserialize)]
struct SubmitResponse {
    message: String,
}
