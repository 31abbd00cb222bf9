use thiserror::Error;

use crate::auth::{DecodeError, StoreError};
use crate::booking::{BookingRejection, BookingStatus};
use crate::errors::{ApiErrorBody, ErrorCode};
use crate::http::refresh::RefreshError;
use crate::http::transport::{ApiResponse, StatusCode, TransportError};

pub const NETWORK_MESSAGE: &str = "Could not connect to the server. Please try again later.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";
const VALIDATION_FALLBACK: &str = "The request was rejected. Please check your input.";
const SERVER_FALLBACK: &str = "The server encountered an error. Please try again later.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Token decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("Unauthorized")]
    Unauthorized { detail: Option<String> },
    #[error("Forbidden")]
    Forbidden { detail: Option<String> },
    #[error("Not found: {path}")]
    NotFound { path: String },
    #[error("Validation error ({status})")]
    Validation {
        status: StatusCode,
        body: ApiErrorBody,
    },
    #[error("Network error: {0}")]
    Network(#[from] TransportError),
    #[error("Server error ({status})")]
    Server {
        status: StatusCode,
        body: ApiErrorBody,
    },
    #[error("Session refresh failed: {0}")]
    RefreshFailed(#[from] RefreshError),
    #[error("Credential storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("Invalid booking: {0}")]
    InvalidBooking(#[from] BookingRejection),
    #[error("Invalid review: {detail}")]
    InvalidReview { detail: String },
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("Invalid registration: {detail}")]
    InvalidRegistration { detail: String },
    #[error("Invalid listing: {detail}")]
    InvalidListing { detail: String },
    #[error("Invalid password reset: {detail}")]
    InvalidPasswordReset { detail: String },
    #[error("Unexpected response body: {detail}")]
    UnexpectedBody { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl ClientError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Decode(_) => ErrorCode::TokenDecode,
            ClientError::Unauthorized { .. } => ErrorCode::Unauthorized,
            ClientError::Forbidden { .. } => ErrorCode::Forbidden,
            ClientError::NotFound { .. } => ErrorCode::NotFound,
            ClientError::Validation { .. } => ErrorCode::ValidationError,
            ClientError::Network(_) => ErrorCode::NetworkUnavailable,
            ClientError::Server { .. } => ErrorCode::ServerError,
            ClientError::RefreshFailed(_) => ErrorCode::RefreshFailed,
            ClientError::Storage(_) => ErrorCode::StorageFailure,
            ClientError::InvalidBooking(_) => ErrorCode::InvalidBooking,
            ClientError::InvalidReview { .. } => ErrorCode::InvalidReview,
            ClientError::InvalidStatusTransition { .. } => ErrorCode::InvalidStatusTransition,
            ClientError::InvalidRegistration { .. } => ErrorCode::InvalidRegistration,
            ClientError::InvalidListing { .. } => ErrorCode::InvalidListing,
            ClientError::InvalidPasswordReset { .. } => ErrorCode::InvalidPasswordReset,
            ClientError::UnexpectedBody { .. } => ErrorCode::UnexpectedBody,
            ClientError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// HTTP status behind this error, when the API produced one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ClientError::Forbidden { .. } => Some(StatusCode::FORBIDDEN),
            ClientError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            ClientError::Validation { status, .. } => Some(*status),
            ClientError::Server { status, .. } => Some(*status),
            ClientError::RefreshFailed(RefreshError::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// True for errors raised before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidBooking(_)
                | ClientError::InvalidReview { .. }
                | ClientError::InvalidStatusTransition { .. }
                | ClientError::InvalidRegistration { .. }
                | ClientError::InvalidListing { .. }
                | ClientError::InvalidPasswordReset { .. }
                | ClientError::Config { .. }
        )
    }

    /// Message suitable for showing inline next to the failed action.
    pub fn user_message(&self) -> String {
        self.message_with_fallback(VALIDATION_FALLBACK)
    }

    /// Like [`user_message`](Self::user_message), with a caller-chosen text for
    /// API rejections whose body carries nothing readable.
    pub fn message_with_fallback(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation { body, .. } => body.flatten(fallback),
            ClientError::Server { body, .. } => body
                .detail()
                .map(str::to_owned)
                .unwrap_or_else(|| SERVER_FALLBACK.to_string()),
            ClientError::Network(_) => NETWORK_MESSAGE.to_string(),
            ClientError::Decode(_) | ClientError::RefreshFailed(_) => {
                SESSION_EXPIRED_MESSAGE.to_string()
            }
            ClientError::Unauthorized { detail } => detail
                .clone()
                .unwrap_or_else(|| "Please sign in to continue.".to_string()),
            ClientError::Forbidden { detail } => detail
                .clone()
                .unwrap_or_else(|| "You do not have permission to do that.".to_string()),
            ClientError::NotFound { .. } => "Not found.".to_string(),
            ClientError::Storage(_) => "Could not save your session on this device.".to_string(),
            ClientError::InvalidBooking(rejection) => rejection.to_string(),
            ClientError::InvalidReview { detail }
            | ClientError::InvalidRegistration { detail }
            | ClientError::InvalidListing { detail }
            | ClientError::InvalidPasswordReset { detail }
            | ClientError::Config { detail } => detail.clone(),
            ClientError::InvalidStatusTransition { from, to } => {
                format!("A {from} booking cannot be marked {to}.")
            }
            ClientError::UnexpectedBody { .. } => {
                "The server sent an unexpected response.".to_string()
            }
        }
    }

    /// Classify a non-success response from `path`.
    pub fn from_response(path: &str, response: &ApiResponse) -> Self {
        let body = ApiErrorBody::from_bytes(&response.body);
        match response.status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized {
                detail: body.detail().map(str::to_owned),
            },
            StatusCode::FORBIDDEN => Self::Forbidden {
                detail: body.detail().map(str::to_owned),
            },
            StatusCode::NOT_FOUND => Self::NotFound {
                path: path.to_string(),
            },
            status if status.is_server_error() => Self::Server { status, body },
            status if status.is_client_error() => Self::Validation { status, body },
            status => Self::UnexpectedBody {
                detail: format!("unexpected status {status} from {path}"),
            },
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized { detail: None }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn unexpected_body(detail: String) -> Self {
        Self::UnexpectedBody { detail }
    }

    pub fn invalid_review(detail: String) -> Self {
        Self::InvalidReview { detail }
    }

    pub fn invalid_registration(detail: String) -> Self {
        Self::InvalidRegistration { detail }
    }

    pub fn invalid_listing(detail: String) -> Self {
        Self::InvalidListing { detail }
    }

    pub fn invalid_password_reset(detail: String) -> Self {
        Self::InvalidPasswordReset { detail }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::unexpected_body(format!("could not encode request body: {e}"))
    }
}
