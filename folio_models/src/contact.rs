use std::{borrow::Cow, collections::BTreeMap};

use nutype::nutype;
use serde::{Deserialize, Serialize};

use crate::email_address::{EmailAddress, EmailAddressError};

/// A contact form submission that satisfies every field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: EmailAddress,
    pub subject: ContactSubject,
    pub message: ContactMessage,
}

#[nutype(
    validate(len_char_min = 2, len_char_max = 50),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactName(String);

#[nutype(
    validate(len_char_min = 5, len_char_max = 100),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactSubject(String);

#[nutype(
    validate(len_char_min = 10, len_char_max = 1000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessage(String);

/// The raw text values of the contact form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

impl ContactField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every constraint violation of a rejected submission, itemized per field.
///
/// Serializes like a flattened zod error:
/// `{"formErrors": [...], "fieldErrors": {"name": [...], ...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactValidationErrors {
    pub form_errors: Vec<Cow<'static, str>>,
    pub field_errors: BTreeMap<ContactField, Vec<Cow<'static, str>>>,
}

impl ContactValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    pub fn field(&self, field: ContactField) -> &[Cow<'static, str>] {
        self.field_errors
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn push(&mut self, field: ContactField, message: impl Into<Cow<'static, str>>) {
        self.field_errors
            .entry(field)
            .or_default()
            .push(message.into());
    }

    pub fn push_form(&mut self, message: impl Into<Cow<'static, str>>) {
        self.form_errors.push(message.into());
    }

    /// Records the violation in `result` (if any) under `field` and returns
    /// the valid value otherwise.
    pub fn check<T, E: ValidationMessage>(
        &mut self,
        field: ContactField,
        result: Result<T, E>,
    ) -> Option<T> {
        result
            .map_err(|err| self.push(field, err.validation_message()))
            .ok()
    }
}

impl std::fmt::Display for ContactValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let form = self.form_errors.iter().map(|msg| (None, msg));
        let fields = self
            .field_errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |msg| (Some(*field), msg)));

        for (i, (field, message)) in form.chain(fields).enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            match field {
                Some(field) => write!(f, "{field}: {message}")?,
                None => f.write_str(message)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ContactValidationErrors {}

/// A human readable description of a field constraint violation.
pub trait ValidationMessage {
    fn validation_message(&self) -> Cow<'static, str>;
}

impl ValidationMessage for ContactNameError {
    fn validation_message(&self) -> Cow<'static, str> {
        match self {
            Self::LenCharMinViolated => "Name must be at least 2 characters".into(),
            Self::LenCharMaxViolated => "Name must be less than 50 characters".into(),
        }
    }
}

impl ValidationMessage for ContactSubjectError {
    fn validation_message(&self) -> Cow<'static, str> {
        match self {
            Self::LenCharMinViolated => "Subject must be at least 5 characters".into(),
            Self::LenCharMaxViolated => "Subject must be less than 100 characters".into(),
        }
    }
}

impl ValidationMessage for ContactMessageError {
    fn validation_message(&self) -> Cow<'static, str> {
        match self {
            Self::LenCharMinViolated => "Message must be at least 10 characters".into(),
            Self::LenCharMaxViolated => "Message must be less than 1000 characters".into(),
        }
    }
}

impl ValidationMessage for EmailAddressError {
    fn validation_message(&self) -> Cow<'static, str> {
        "Please enter a valid email address".into()
    }
}

impl ContactSubmission {
    /// Validates the fields that are present and merges their violations into
    /// `errors`.
    ///
    /// Absent fields are expected to already have an entry in `errors`. The
    /// submission is only accepted if no violation has been recorded at all.
    pub fn validate(
        mut errors: ContactValidationErrors,
        name: Option<String>,
        email: Option<String>,
        subject: Option<String>,
        message: Option<String>,
    ) -> Result<Self, ContactValidationErrors> {
        let name = name.and_then(|x| errors.check(ContactField::Name, ContactName::try_new(x)));
        let email = email.and_then(|x| errors.check(ContactField::Email, x.parse::<EmailAddress>()));
        let subject =
            subject.and_then(|x| errors.check(ContactField::Subject, ContactSubject::try_new(x)));
        let message =
            message.and_then(|x| errors.check(ContactField::Message, ContactMessage::try_new(x)));

        match (name, email, subject, message) {
            (Some(name), Some(email), Some(subject), Some(message)) if errors.is_empty() => {
                Ok(Self {
                    name,
                    email,
                    subject,
                    message,
                })
            }
            _ => Err(errors),
        }
    }
}

impl TryFrom<ContactForm> for ContactSubmission {
    type Error = ContactValidationErrors;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        Self::validate(
            Default::default(),
            Some(form.name),
            Some(form.email),
            Some(form.subject),
            Some(form.message),
        )
    }
}

impl From<ContactSubmission> for ContactForm {
    fn from(value: ContactSubmission) -> Self {
        Self {
            name: value.name.into_inner(),
            email: value.email.as_str().into(),
            subject: value.subject.into_inner(),
            message: value.message.into_inner(),
        }
    }
}
