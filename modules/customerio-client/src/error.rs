use thiserror::Error;

pub type Result<T> = std::result::Result<T, CustomerIoError>;

#[derive(Debug, Error)]
pub enum CustomerIoError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CustomerIoError {
    /// The human-readable part of the failure, without the variant prefix.
    pub fn provider_message(&self) -> &str {
        match self {
            CustomerIoError::Network(message) => message,
            CustomerIoError::Api { message, .. } => message,
            CustomerIoError::InvalidRequest(message) => message,
        }
    }
}

impl From<reqwest::Error> for CustomerIoError {
    fn from(err: reqwest::Error) -> Self {
        CustomerIoError::Network(err.to_string())
    }
}
