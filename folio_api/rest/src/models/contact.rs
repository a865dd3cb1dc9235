use folio_models::contact::{ContactField, ContactSubmission, ContactValidationErrors};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Serialize)]
pub struct ApiContactResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Parse and validate the raw request body of a contact form submission.
///
/// Unknown fields are ignored. Every missing, mistyped or invalid field is
/// reported, not just the first one.
pub fn parse_submission(body: &[u8]) -> Result<ContactSubmission, ContactValidationErrors> {
    let mut errors = ContactValidationErrors::default();

    let mut object = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => object,
        Ok(value) => {
            errors.push_form(format!("Expected object, received {}", type_name(&value)));
            return Err(errors);
        }
        Err(_) => {
            errors.push_form("Malformed JSON body");
            return Err(errors);
        }
    };

    let name = take_string(&mut object, &mut errors, ContactField::Name);
    let email = take_string(&mut object, &mut errors, ContactField::Email);
    let subject = take_string(&mut object, &mut errors, ContactField::Subject);
    let message = take_string(&mut object, &mut errors, ContactField::Message);

    ContactSubmission::validate(errors, name, email, subject, message)
}

fn take_string(
    object: &mut Map<String, Value>,
    errors: &mut ContactValidationErrors,
    field: ContactField,
) -> Option<String> {
    match object.remove(field.as_str()) {
        Some(Value::String(value)) => Some(value),
        Some(value) => {
            errors.push(
                field,
                format!("Expected string, received {}", type_name(&value)),
            );
            None
        }
        None => {
            errors.push(field, "Required");
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> Result<ContactSubmission, ContactValidationErrors> {
        parse_submission(&serde_json::to_vec(&value).unwrap())
    }

    #[test]
    fn valid_ignores_unknown_fields() {
        let result = parse(json!({
            "name": "Jo",
            "email": "jo@x.com",
            "subject": "Hello there",
            "message": "This is a test message.",
            "website": "https://example.com",
        }));

        let submission = result.unwrap();
        assert_eq!(*submission.name, "Jo");
    }

    #[test]
    fn missing_and_mistyped_fields() {
        let result = parse(json!({
            "name": 42,
            "subject": null,
            "message": "This is a test message.",
        }));

        let errors = result.unwrap_err();
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({
                "formErrors": [],
                "fieldErrors": {
                    "name": ["Expected string, received number"],
                    "email": ["Required"],
                    "subject": ["Expected string, received null"],
                },
            })
        );
    }

    #[test]
    fn mistyped_and_invalid_fields_are_reported_together() {
        let result = parse(json!({
            "name": ["Jo"],
            "email": "not-an-email",
            "subject": "Hello there",
            "message": "This is a test message.",
        }));

        let errors = result.unwrap_err();
        assert_eq!(
            errors.field(ContactField::Name),
            ["Expected string, received array"]
        );
        assert_eq!(
            errors.field(ContactField::Email),
            ["Please enter a valid email address"]
        );
        assert_eq!(errors.field_errors.len(), 2);
    }

    #[test]
    fn not_an_object() {
        let result = parse(json!(["Jo", "jo@x.com"]));

        let errors = result.unwrap_err();
        assert_eq!(errors.form_errors, ["Expected object, received array"]);
        assert!(errors.field_errors.is_empty());
    }

    #[test]
    fn malformed_json() {
        let result = parse_submission(b"{\"name\": ");

        let errors = result.unwrap_err();
        assert_eq!(errors.form_errors, ["Malformed JSON body"]);
    }
}
