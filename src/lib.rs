pub mod config;
pub mod error;
pub mod models;
pub mod shipment;
pub mod transport;

pub use error::TrackingError;
pub use shipment::{DEFAULT_BASE_URL, TrackingClient};
pub use transport::{AuthenticatingTransport, Transport, TransportError};
