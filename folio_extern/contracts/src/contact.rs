use std::future::Future;

use folio_models::contact::ContactSubmission;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactApiService: Send + Sync + 'static {
    /// Post the submission to the contact endpoint.
    ///
    /// Returns the confirmation message of the server, or a generic one if
    /// the response has none. Any non-2xx response and any transport failure
    /// is an error.
    fn submit(
        &self,
        submission: &ContactSubmission,
    ) -> impl Future<Output = anyhow::Result<String>> + Send;
}

#[cfg(feature = "mock")]
impl MockContactApiService {
    pub fn with_submit(mut self, submission: ContactSubmission, result: Option<String>) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| {
                Box::pin(std::future::ready(
                    result.ok_or_else(|| anyhow::anyhow!("request failed")),
                ))
            });
        self
    }
}
