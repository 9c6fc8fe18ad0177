use reqwest::StatusCode;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Client-side precondition failure. Raised before any network call.
    #[error("{reason}")]
    Validation {
        reason: &'static str,
        hint: &'static str,
    },
    #[error("{reason}")]
    State {
        reason: &'static str,
        hint: &'static str,
    },
    #[error("remote service returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Remote {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("{0}")]
    Message(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl AppError {
    pub fn msg<T: Into<String>>(message: T) -> Self {
        Self::Message(message.into())
    }

    pub fn validation(reason: &'static str, hint: &'static str) -> Self {
        Self::Validation { reason, hint }
    }

    pub fn state(reason: &'static str, hint: &'static str) -> Self {
        Self::State { reason, hint }
    }

    pub fn malformed<T: Into<String>>(detail: T) -> Self {
        Self::MalformedResponse(detail.into())
    }

    /// True for failures raised locally, before anything was sent.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::State { .. })
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Validation { reason, .. } | Self::State { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
