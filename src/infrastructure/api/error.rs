use thiserror::Error;

/// Error type for the price source and notifier clients
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// Error from the reqwest HTTP client
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// Error parsing JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// The remote API answered with a non-success status
    #[error("API error: {status} from {endpoint}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
}
