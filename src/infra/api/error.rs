use reqwest::StatusCode;
use thiserror::Error;

use crate::infra::lifetime::Cancelled;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error: status {status}{}", describe(.message))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("failed to parse body: {0}")]
    Decode(String),
    #[error("invalid path segment: {0:?}")]
    InvalidSegment(String),
    #[error("invalid header value: {0}")]
    InvalidHeader(String),
    #[error("request cancelled")]
    Cancelled,
}

fn describe(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|text| format!(": {text}"))
        .unwrap_or_default()
}

impl From<Cancelled> for ApiError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl ApiError {
    /// Message the server put in the error body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
