use thiserror::Error;

/// Errors returned by the strict [`RecipeApi`](crate::RecipeApi) calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection, TLS or body read failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The server answered with a non-success status
    #[error("Unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The body was not the expected JSON envelope
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Classify a reqwest error, pulling timeouts out into their own variant
    pub(crate) fn from_request(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
            }
        } else {
            ApiError::Transport(err)
        }
    }
}

/// Errors surfaced to callers of the detail and configuration layers
#[derive(Error, Debug)]
pub enum BrowseError {
    /// Detail lookup was asked for without an identifier
    #[error("No recipe ID provided")]
    MissingId,

    /// The API answered but had no recipe with this identifier
    #[error("Recipe not found")]
    NotFound,

    /// Underlying API failure
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
