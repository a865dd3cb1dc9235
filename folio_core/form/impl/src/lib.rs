use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use folio_core_form_contracts::{ContactFormService, ContactFormState, ContactFormSubmitError};
use folio_extern_contracts::contact::ContactApiService;
use folio_models::contact::{ContactForm, ContactSubmission};
use folio_shared_contracts::time::TimeService;
use tokio::sync::RwLock;
use tracing::{error, info};


#[derive(Debug, Clone)]
pub struct ContactFormServiceImpl<Time, ContactApi> {
    time: Time,
    contact_api: ContactApi,
    config: ContactFormServiceConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct ContactFormServiceConfig {
    /// How long the confirmation is shown after a successful submission.
    pub confirmation_duration: Duration,
}

impl Default for ContactFormServiceConfig {
    fn default() -> Self {
        Self {
            confirmation_duration: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    /// Set for as long as a submission is running. Reads as
    /// [`ContactFormState::Submitting`].
    in_flight: AtomicBool,
    /// Outcome of the last settled submission.
    status: RwLock<Status>,
}

#[derive(Debug, Default)]
enum Status {
    #[default]
    Idle,
    Submitted {
        message: String,
        timestamp: DateTime<Utc>,
    },
    Failed,
}

/// Clears the in-flight flag once the submission settles or is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<Time, ContactApi> ContactFormServiceImpl<Time, ContactApi> {
    pub fn new(time: Time, contact_api: ContactApi, config: ContactFormServiceConfig) -> Self {
        Self {
            time,
            contact_api,
            config,
            state: Default::default(),
        }
    }
}

impl<Time, ContactApi> ContactFormService for ContactFormServiceImpl<Time, ContactApi>
where
    Time: TimeService,
    ContactApi: ContactApiService,
{
    async fn submit(&self, form: ContactForm) -> Result<String, ContactFormSubmitError> {
        let Some(_guard) = InFlightGuard::acquire(&self.state.in_flight) else {
            return Err(ContactFormSubmitError::InFlight);
        };

        let submission =
            ContactSubmission::try_from(form).map_err(ContactFormSubmitError::Invalid)?;

        // clear the previous outcome, a dropped submission settles as idle
        *self.state.status.write().await = Status::Idle;

        let result = self.contact_api.submit(&submission).await;

        let mut status = self.state.status.write().await;
        match result {
            Ok(message) => {
                info!("contact form submitted");
                *status = Status::Submitted {
                    message: message.clone(),
                    timestamp: self.time.now(),
                };
                Ok(message)
            }
            Err(err) => {
                error!("Failed to submit contact form: {err:#}");
                *status = Status::Failed;
                Err(ContactFormSubmitError::Failed)
            }
        }
    }

    async fn state(&self) -> ContactFormState {
        if self.state.in_flight.load(Ordering::Acquire) {
            return ContactFormState::Submitting;
        }

        match &*self.state.status.read().await {
            Status::Idle => ContactFormState::Idle,
            Status::Submitted { message, timestamp } => {
                if self.time.now() < *timestamp + self.config.confirmation_duration {
                    ContactFormState::Submitted {
                        message: message.clone(),
                    }
                } else {
                    ContactFormState::Idle
                }
            }
            Status::Failed => ContactFormState::Failed,
        }
    }
}
