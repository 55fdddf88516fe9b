use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Watchmode API returned status {status}: {body}")]
    ExternalApi { status: u16, body: String },

    #[error("Failed to parse provider response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse category of a failed provider call, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The provider could not be reached at all
    Network,
    /// 4xx response
    InvalidRequest,
    /// 5xx response
    Server,
    Unexpected,
}

impl FailureKind {
    fn from_status(status: u16) -> Self {
        match status {
            400..=499 => FailureKind::InvalidRequest,
            500..=599 => FailureKind::Server,
            _ => FailureKind::Unexpected,
        }
    }

    /// Short message suitable for a transient notification
    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::Network => "Network error. Please check your internet connection.",
            FailureKind::InvalidRequest => "Invalid request. Please try again.",
            FailureKind::Server => "Server error. Please try again later.",
            FailureKind::Unexpected => "An unexpected error occurred.",
        }
    }
}

impl AppError {
    /// Classifies the error into one of the user-facing failure categories
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            AppError::HttpClient(e) => {
                if let Some(status) = e.status() {
                    FailureKind::from_status(status.as_u16())
                } else if e.is_connect() || e.is_timeout() || e.is_request() {
                    FailureKind::Network
                } else {
                    FailureKind::Unexpected
                }
            }
            AppError::ExternalApi { status, .. } => FailureKind::from_status(*status),
            AppError::InvalidInput(_) | AppError::NotFound(_) => FailureKind::InvalidRequest,
            _ => FailureKind::Unexpected,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.failure_kind().user_message()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Storage(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::ExternalApi { .. } | AppError::HttpClient(_) | AppError::Decode(_) => {
                (StatusCode::BAD_GATEWAY, self.user_message().to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
