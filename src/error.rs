use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("error creating request: {0}")]
    Request(String),

    #[error("error executing request: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SinkError {
    /// Request construction and execution failures leave the sink unable to
    /// deliver anything; the host is expected to terminate on them.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SinkError::Request(_) | SinkError::Transport(_))
    }
}

impl From<reqwest::Error> for SinkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            SinkError::Request(err.to_string())
        } else {
            SinkError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(err: serde_json::Error) -> Self {
        SinkError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::Io(err.to_string())
    }
}

impl From<prometheus::Error> for SinkError {
    fn from(err: prometheus::Error) -> Self {
        SinkError::Internal(err.to_string())
    }
}

impl IntoResponse for SinkError {
    fn into_response(self) -> Response {
        let status = match self {
            SinkError::Config(_) | SinkError::Serialization(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SinkError>;
