use thiserror::Error;

/// Failures surfaced by every call through the fetch client.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("http status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("unable to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
