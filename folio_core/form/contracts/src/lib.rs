//! Client side handling of the contact form.

use std::future::Future;

use folio_models::contact::{ContactForm, ContactValidationErrors};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFormService: Send + Sync + 'static {
    /// Validate the form and submit it to the contact endpoint.
    ///
    /// Issues at most one request per call and returns the confirmation
    /// message of the server.
    fn submit(
        &self,
        form: ContactForm,
    ) -> impl Future<Output = Result<String, ContactFormSubmitError>> + Send;

    /// Return the current state of the form.
    fn state(&self) -> impl Future<Output = ContactFormState> + Send;
}

#[derive(Debug, Error)]
pub enum ContactFormSubmitError {
    #[error("A submission is already in progress.")]
    InFlight,
    #[error("Invalid form data: {0}")]
    Invalid(ContactValidationErrors),
    #[error("Failed to send message.")]
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactFormState {
    Idle,
    Submitting,
    /// The submission has been accepted. Reverts to [`ContactFormState::Idle`]
    /// once the confirmation has been displayed long enough.
    Submitted {
        message: String,
    },
    Failed,
}
