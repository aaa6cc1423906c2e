use thiserror::Error;

/// Failures talking to the remote API.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// Network or protocol level failure.
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request to '{method}' failed with status {status}: {body}")]
    Status {
        method: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response from '{method}': {reason}")]
    Decode { method: String, reason: String },

    /// The API answered with an error object instead of data.
    #[error("API error from '{method}': {message}")]
    Api { method: String, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error writing to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}
