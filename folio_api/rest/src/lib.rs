use std::net::SocketAddr;

use axum::{http::HeaderValue, Router};
use folio_core_contact_contracts::ContactService;
use tokio::net::TcpListener;
use tracing::info;

mod errors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: SocketAddr,
    pub allowed_origins: Vec<HeaderValue>,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactService,
{
    pub fn new(contact: Contact, config: RestServerConfig) -> Self {
        Self { contact, config }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<()> {
        info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, self.router())
            .await
            .map_err(Into::into)
    }

    pub fn router(self) -> Router<()> {
        let router = Router::new()
            .merge(routes::contact::router(self.contact.into()))
            .fallback(routes::not_found);

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        let router = middlewares::cors::add(self.config.allowed_origins)(router);
        middlewares::request_id::add(router)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use folio_core_contact_contracts::MockContactService;
    use tower::ServiceExt;

    use super::*;
    use crate::middlewares::request_id::REQUEST_ID_HEADER;

    fn make_sut(allowed_origins: &[&'static str]) -> Router<()> {
        RestServer::new(
            MockContactService::new(),
            RestServerConfig {
                addr: ([127, 0, 0, 1], 0).into(),
                allowed_origins: allowed_origins
                    .iter()
                    .map(|&x| HeaderValue::from_static(x))
                    .collect(),
            },
        )
        .router()
    }

    #[tokio::test]
    async fn not_found() {
        // Arrange
        let sut = make_sut(&[]);
        let request = Request::get("/does-not-exist").body(Body::empty()).unwrap();

        // Act
        let response = sut.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"error":"Not found"}"#);
    }

    #[tokio::test]
    async fn request_id() {
        // Arrange
        let sut = make_sut(&[]);
        let request = Request::get("/api/contact").body(Body::empty()).unwrap();

        // Act
        let response = sut.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let request_id = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert_eq!(request_id.len(), 22);
    }

    #[tokio::test]
    async fn handler_panic() {
        // Arrange
        // the mock panics on the unexpected call
        let sut = make_sut(&[]);
        let request = Request::post("/api/contact")
            .body(Body::from(
                r#"{"name":"Jo","email":"jo@x.com","subject":"Hello there","message":"This is a test message."}"#,
            ))
            .unwrap();

        // Act
        let response = sut.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn cors_preflight() {
        // Arrange
        let sut = make_sut(&["https://example.com"]);
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/contact")
            .header(header::ORIGIN, "https://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = sut.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("https://example.com"))
        );
    }

    #[tokio::test]
    async fn cors_unknown_origin() {
        // Arrange
        let sut = make_sut(&["https://example.com"]);
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/contact")
            .header(header::ORIGIN, "https://evil.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = sut.oneshot(request).await.unwrap();

        // Assert
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
