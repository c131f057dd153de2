use customerio_client::CustomerIoError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackingError>;

/// Errors returned to the host from the forwarder's handlers.
///
/// Both variants are client-side failures from the host's point of view and
/// map to HTTP 400 at its boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackingError {
    /// Customer.io rejected the call or could not be reached.
    #[error("Customer.io request failed: {message}")]
    ProviderRequestFailed { message: String },

    #[error("Customer id must not be empty")]
    MissingCustomerId,
}

impl TrackingError {
    pub fn status_code(&self) -> u16 {
        400
    }
}

impl From<CustomerIoError> for TrackingError {
    fn from(err: CustomerIoError) -> Self {
        TrackingError::ProviderRequestFailed {
            message: err.provider_message().to_string(),
        }
    }
}
