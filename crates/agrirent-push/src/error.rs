//! Push relay errors.

use thiserror::Error;

use agrirent_core::error::{AppError, ErrorKind};

/// A failed relay request.
#[derive(Debug, Clone, Error)]
pub enum PushError {
    /// The request never produced a response (DNS, connect, reset).
    #[error("push relay transport error: {0}")]
    Transport(String),
    /// The request exceeded its deadline.
    #[error("push relay request timed out")]
    Timeout,
    /// The relay answered with a non-success status.
    #[error("push relay returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// The relay answered 2xx with a body that is not a ticket list.
    #[error("invalid push relay response: {0}")]
    InvalidResponse(String),
}

impl PushError {
    /// Whether the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for PushError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<PushError> for AppError {
    fn from(err: PushError) -> Self {
        let kind = match err {
            PushError::Timeout => ErrorKind::Timeout,
            _ => ErrorKind::ExternalService,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}
