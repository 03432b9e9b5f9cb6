use thiserror::Error;

use crate::models::ProblemDetail;
use crate::transport::TransportError;

/// Failure of a tracking lookup.
///
/// The variants let callers tell "could not reach the service" apart from
/// "the service rejected the query" without inspecting messages.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// The request never produced a response.
    #[error("Failed to send request to Tracking API: {0}")]
    Transport(#[from] TransportError),

    /// A response arrived but its body could not be read.
    #[error("Failed to read Tracking API response body: {0}")]
    BodyRead(#[source] reqwest::Error),

    /// The body was not the expected JSON document.
    #[error("Failed to parse Tracking API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API answered with an RFC 7807 problem. Displays as the upstream `detail`.
    #[error("{}", .0.detail)]
    Api(ProblemDetail),
}

impl TrackingError {
    /// True when the service answered and rejected the query.
    pub fn is_api_error(&self) -> bool {
        matches!(self, TrackingError::Api(_))
    }

    /// The problem reported by the API, if this is an API error.
    pub fn problem(&self) -> Option<&ProblemDetail> {
        match self {
            TrackingError::Api(problem) => Some(problem),
            _ => None,
        }
    }
}
