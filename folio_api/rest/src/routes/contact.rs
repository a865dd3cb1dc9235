use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_contact_contracts::{ContactSendMessageError, ContactService};

use super::method_not_allowed;
use crate::{
    errors::{internal_server_error, validation_error},
    models::contact::{parse_submission, ApiContactResponse},
};

pub const SUCCESS_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route(
            "/api/contact",
            routing::post(send_message).fallback(method_not_allowed),
        )
        .with_state(service)
}

async fn send_message(service: State<Arc<impl ContactService>>, body: Bytes) -> Response {
    let submission = match parse_submission(&body) {
        Ok(submission) => submission,
        Err(errors) => return validation_error(&errors),
    };

    match service.send_message(submission).await {
        Ok(()) => Json(ApiContactResponse {
            success: true,
            message: SUCCESS_MESSAGE,
        })
        .into_response(),
        Err(ContactSendMessageError::Send) => {
            internal_server_error(anyhow!("the mail relay did not accept the message"))
        }
        Err(ContactSendMessageError::Other(err)) => internal_server_error(err),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use folio_core_contact_contracts::MockContactService;
    use folio_models::contact::{ContactForm, ContactSubmission};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn submission() -> ContactSubmission {
        ContactForm {
            name: "Jo".into(),
            email: "jo@x.com".into(),
            subject: "Hello there".into(),
            message: "This is a test message.".into(),
        }
        .try_into()
        .unwrap()
    }

    async fn request(
        service: MockContactService,
        method: Method,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let body = body
            .map(|body| Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap_or_else(Body::empty);
        let request = Request::builder()
            .method(method)
            .uri("/api/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();

        let response = router(Arc::new(service)).oneshot(request).await.unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let service = MockContactService::new().with_send_message(submission(), Ok(()));

        // Act
        let (status, body) = request(
            service,
            Method::POST,
            Some(json!({
                "name": "Jo",
                "email": "jo@x.com",
                "subject": "Hello there",
                "message": "This is a test message.",
            })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "message": "Message sent successfully! I'll get back to you soon.",
            })
        );
    }

    #[tokio::test]
    async fn invalid() {
        // Arrange
        let service = MockContactService::new();

        // Act
        let (status, body) = request(
            service,
            Method::POST,
            Some(json!({
                "name": "J",
                "email": "not-an-email",
                "subject": "Hi",
                "message": "short",
            })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "error": "Invalid form data",
                "details": {
                    "formErrors": [],
                    "fieldErrors": {
                        "name": ["Name must be at least 2 characters"],
                        "email": ["Please enter a valid email address"],
                        "subject": ["Subject must be at least 5 characters"],
                        "message": ["Message must be at least 10 characters"],
                    },
                },
            })
        );
    }

    #[tokio::test]
    async fn malformed_json() {
        // Arrange
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/contact")
            .body(Body::from("not json"))
            .unwrap();

        // Act
        let response = router(Arc::new(MockContactService::new()))
            .oneshot(request)
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn send_failed() {
        // Arrange
        let service = MockContactService::new()
            .with_send_message(submission(), Err(ContactSendMessageError::Send));

        // Act
        let (status, body) = request(
            service,
            Method::POST,
            Some(json!({
                "name": "Jo",
                "email": "jo@x.com",
                "subject": "Hello there",
                "message": "This is a test message.",
            })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Internal server error"}));
    }

    #[tokio::test]
    async fn dispatch_error() {
        // Arrange
        let service = MockContactService::new().with_send_message(
            submission(),
            Err(anyhow!("missing credentials").into()),
        );

        // Act
        let (status, body) = request(
            service,
            Method::POST,
            Some(json!({
                "name": "Jo",
                "email": "jo@x.com",
                "subject": "Hello there",
                "message": "This is a test message.",
            })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Internal server error"}));
    }

    #[tokio::test]
    async fn other_methods() {
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
            // Arrange
            let service = MockContactService::new();

            // Act
            let (status, body) = request(service, method.clone(), None).await;

            // Assert
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
            assert_eq!(body, json!({"error": "Method not allowed"}));
        }
    }
}
