use reqwest::{Method, Request, StatusCode, Url};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::TrackingError;
use crate::models::{ProblemDetail, ShipmentsResult};
use crate::transport::{Transport, TransportError, authenticated_transport};

pub const DEFAULT_BASE_URL: &str = "https://api-eu.dhl.com/track";

/// Client for the DHL Shipment Tracking - Unified API.
///
/// Holds no per-call state, so one instance can serve concurrent lookups.
#[derive(Clone)]
pub struct TrackingClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl TrackingClient {
    /// Uses `transport` for every call. It is expected to add the API key,
    /// e.g. an [`AuthenticatingTransport`](crate::transport::AuthenticatingTransport).
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_base_url(transport, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let transport =
            authenticated_transport(config.dhl_api_key.clone(), Some(config.request_timeout))?;

        Ok(Self::with_base_url(
            Arc::new(transport),
            config.tracking_url.clone(),
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retrieves the tracking information for the shipment(s) identified by `tracking_number`.
    ///
    /// Any status other than 200 is decoded as a problem detail and returned as
    /// [`TrackingError::Api`], whose message is the problem's `detail`.
    #[instrument(skip(self), fields(http.status_code = tracing::field::Empty))]
    pub async fn shipments(&self, tracking_number: &str) -> Result<ShipmentsResult, TrackingError> {
        let request = self.shipments_request(tracking_number)?;
        debug!(url = %request.url(), "Querying Tracking API");

        let response = self.transport.execute(request).await?;
        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());

        let body = response.bytes().await.map_err(TrackingError::BodyRead)?;
        debug!(bytes = body.len(), "Tracking API responded");

        if status != StatusCode::OK {
            let problem: ProblemDetail = serde_json::from_slice(&body)?;
            return Err(TrackingError::Api(problem));
        }

        Ok(serde_json::from_slice(&body)?)
    }

    fn shipments_request(&self, tracking_number: &str) -> Result<Request, TransportError> {
        let mut url = Url::parse(&format!(
            "{}/shipments",
            self.base_url.trim_end_matches('/')
        ))?;
        url.query_pairs_mut()
            .append_pair("trackingNumber", tracking_number);

        Ok(Request::new(Method::GET, url))
    }
}
