//! Wiring of the concrete service implementations.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::http::HeaderValue;
use folio_api_rest::RestServerConfig;
use folio_config::{Config, ContactDispatchMode, EmailConfig};
use folio_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use folio_core_form_impl::{ContactFormServiceConfig, ContactFormServiceImpl};
use folio_email_impl::{EmailServiceConfig, EmailServiceImpl};
use folio_extern_impl::contact::{ContactApiServiceConfig, ContactApiServiceImpl};
use folio_shared_impl::time::TimeServiceImpl;
use url::Url;

pub type ContactService = ContactServiceImpl<TimeServiceImpl, EmailServiceImpl>;
pub type RestServer = folio_api_rest::RestServer<ContactService>;
pub type ContactFormService = ContactFormServiceImpl<TimeServiceImpl, ContactApiServiceImpl>;

pub fn email_service(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(EmailServiceConfig {
        smtp_url: config.smtp_url.clone(),
        username_env: config.username_env.clone(),
        password_env: config.password_env.clone(),
    })
}

pub fn rest_server(config: &Config) -> anyhow::Result<RestServer> {
    let allowed_origins = config
        .http
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid allowed origin {origin:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let contact_config = match config.contact.dispatch {
        ContactDispatchMode::Log => ContactServiceConfig::Log {
            delay: *config.contact.log_delay,
        },
        ContactDispatchMode::Email => ContactServiceConfig::Email {
            recipient: config.contact.recipient.clone().map(Arc::new),
        },
    };

    let contact = ContactServiceImpl::new(
        TimeServiceImpl,
        email_service(&config.email)?,
        contact_config,
    );

    Ok(RestServer::new(
        contact,
        RestServerConfig {
            addr: SocketAddr::new(config.http.host, config.http.port),
            allowed_origins,
        },
    ))
}

/// `api_url` overrides `client.api_url` of the config.
pub fn contact_form_service(
    config: &Config,
    api_url: Option<&Url>,
) -> anyhow::Result<ContactFormService> {
    let api_url = api_url.unwrap_or(&config.client.api_url);
    let contact_api = ContactApiServiceImpl::new(ContactApiServiceConfig::new(api_url)?)?;

    Ok(ContactFormServiceImpl::new(
        TimeServiceImpl,
        contact_api,
        ContactFormServiceConfig {
            confirmation_duration: *config.client.confirmation_duration,
        },
    ))
}
