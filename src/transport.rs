use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Request, Response};
use thiserror::Error;

/// Header carrying the API key on every call to the DHL APIs.
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("dhl-api-key");

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API key cannot be used as a header value")]
    InvalidApiKey,

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Something that turns a request into a response.
///
/// Implemented by `reqwest::Client` and by decorators wrapping another transport.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response, TransportError>;
}

#[async_trait]
impl Transport for Client {
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        Ok(Client::execute(self, request).await?)
    }
}

/// Adds the `DHL-API-Key` header to each request, then hands it to the inner transport.
pub struct AuthenticatingTransport {
    inner: Arc<dyn Transport>,
    api_key: String,
}

impl AuthenticatingTransport {
    pub fn new(inner: Arc<dyn Transport>, api_key: impl Into<String>) -> Self {
        Self {
            inner,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Transport for AuthenticatingTransport {
    async fn execute(&self, mut request: Request) -> Result<Response, TransportError> {
        let value =
            HeaderValue::from_str(&self.api_key).map_err(|_| TransportError::InvalidApiKey)?;
        // append, not insert: a caller-set value under the same name is kept
        request.headers_mut().append(API_KEY_HEADER, value);

        self.inner.execute(request).await
    }
}

/// Builds the plain HTTP client used underneath the authenticating layer.
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client, TransportError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

/// An HTTP client that authenticates every request with `api_key`.
pub fn authenticated_transport(
    api_key: impl Into<String>,
    timeout: Option<Duration>,
) -> Result<AuthenticatingTransport, TransportError> {
    let http_client = build_http_client(timeout)?;
    Ok(AuthenticatingTransport::new(Arc::new(http_client), api_key))
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex;

    /// What a [`RecordingTransport`] saw of one request.
    #[derive(Debug, Clone)]
    pub struct SeenRequest {
        pub method: reqwest::Method,
        pub url: reqwest::Url,
        pub headers: reqwest::header::HeaderMap,
        pub body: Option<Vec<u8>>,
    }

    /// Answers every request with a fixed status and body, recording what it was sent.
    #[derive(Clone)]
    pub struct RecordingTransport {
        status: u16,
        body: String,
        pub calls: Arc<Mutex<Vec<SeenRequest>>>,
    }

    impl RecordingTransport {
        pub fn new(status: u16, body: impl Into<String>) -> Self {
            Self {
                status,
                body: body.into(),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn seen(&self) -> Vec<SeenRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn execute(&self, request: Request) -> Result<Response, TransportError> {
            self.calls.lock().unwrap().push(SeenRequest {
                method: request.method().clone(),
                url: request.url().clone(),
                headers: request.headers().clone(),
                body: request
                    .body()
                    .and_then(|b| b.as_bytes())
                    .map(|b| b.to_vec()),
            });

            let response = http::Response::builder()
                .status(self.status)
                .header("content-type", "application/json")
                .body(self.body.clone())
                .unwrap();
            Ok(Response::from(response))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::RecordingTransport;
    use super::*;
    use reqwest::Method;

    fn request(method: Method, url: &str) -> Request {
        Request::new(method, reqwest::Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn adds_api_key_header() {
        let inner = RecordingTransport::new(200, "{}");
        let transport = AuthenticatingTransport::new(Arc::new(inner.clone()), "secret-key");

        let response = transport
            .execute(request(Method::GET, "https://api-eu.dhl.com/track/shipments"))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let seen = inner.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].headers.get("DHL-API-Key").unwrap(), "secret-key");
    }

    #[tokio::test]
    async fn leaves_method_url_and_body_alone() {
        let inner = RecordingTransport::new(201, "");
        let transport = AuthenticatingTransport::new(Arc::new(inner.clone()), "secret-key");

        let mut req = request(Method::POST, "https://example.com/upload?x=1");
        *req.body_mut() = Some(reqwest::Body::from("payload"));
        req.headers_mut()
            .insert("x-request-id", HeaderValue::from_static("abc"));

        transport.execute(req).await.unwrap();

        let seen = &inner.seen()[0];
        assert_eq!(seen.method, Method::POST);
        assert_eq!(seen.url.as_str(), "https://example.com/upload?x=1");
        assert_eq!(seen.body.as_deref(), Some(&b"payload"[..]));
        assert_eq!(seen.headers.get("x-request-id").unwrap(), "abc");
        assert_eq!(seen.headers.get(API_KEY_HEADER).unwrap(), "secret-key");
    }

    #[tokio::test]
    async fn appends_to_existing_api_key_header() {
        let inner = RecordingTransport::new(200, "{}");
        let transport = AuthenticatingTransport::new(Arc::new(inner.clone()), "configured");

        let mut req = request(Method::GET, "https://api-eu.dhl.com/track/shipments");
        req.headers_mut()
            .insert(API_KEY_HEADER, HeaderValue::from_static("caller"));
        transport.execute(req).await.unwrap();

        let seen = &inner.seen()[0];
        let values: Vec<_> = seen.headers.get_all(API_KEY_HEADER).iter().collect();
        assert_eq!(values, vec!["caller", "configured"]);
    }

    #[tokio::test]
    async fn passes_inner_status_through() {
        let inner = RecordingTransport::new(503, "down");
        let transport = AuthenticatingTransport::new(Arc::new(inner), "secret-key");

        let response = transport
            .execute(request(Method::GET, "https://api-eu.dhl.com/track/shipments"))
            .await
            .unwrap();
        assert_eq!(response.status(), 503);
        assert_eq!(response.text().await.unwrap(), "down");
    }

    #[tokio::test]
    async fn rejects_unrepresentable_key_before_sending() {
        let inner = RecordingTransport::new(200, "{}");
        let transport = AuthenticatingTransport::new(Arc::new(inner.clone()), "bad\nkey");

        let result = transport
            .execute(request(Method::GET, "https://api-eu.dhl.com/track/shipments"))
            .await;

        assert!(matches!(result, Err(TransportError::InvalidApiKey)));
        assert!(inner.seen().is_empty());
    }

    #[tokio::test]
    async fn shared_inner_transport_sees_every_caller() {
        let inner = Arc::new(RecordingTransport::new(200, "{}"));
        let first = AuthenticatingTransport::new(inner.clone(), "key-one");
        let second = AuthenticatingTransport::new(inner.clone(), "key-two");

        first
            .execute(request(Method::GET, "https://example.com/a"))
            .await
            .unwrap();
        second
            .execute(request(Method::GET, "https://example.com/b"))
            .await
            .unwrap();

        let seen = inner.seen();
        assert_eq!(seen[0].headers.get(API_KEY_HEADER).unwrap(), "key-one");
        assert_eq!(seen[1].headers.get(API_KEY_HEADER).unwrap(), "key-two");
    }

    #[test]
    fn builds_http_client_with_and_without_timeout() {
        assert!(build_http_client(None).is_ok());
        assert!(build_http_client(Some(Duration::from_secs(5))).is_ok());
        assert!(authenticated_transport("secret-key", Some(Duration::from_secs(5))).is_ok());
    }
}
