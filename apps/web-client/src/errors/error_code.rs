//! Error codes for the web client.
//!
//! Every `ClientError` maps to exactly one code. Add new codes here; never pass
//! ad-hoc strings as error codes. Codes are SCREAMING_SNAKE_CASE.

use core::fmt;

/// Centralized error codes surfaced by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// The API rejected the credentials or the session
    Unauthorized,
    /// Authenticated, but not allowed to perform the action
    Forbidden,
    /// The stored access token could not be decoded
    TokenDecode,
    /// The one-shot token refresh failed
    RefreshFailed,

    // Request Validation
    /// Field-level validation errors from the API
    ValidationError,
    /// Booking draft rejected locally before any network call
    InvalidBooking,
    /// Review rejected locally before any network call
    InvalidReview,
    /// Host status transition rejected locally
    InvalidStatusTransition,
    /// Registration form rejected locally
    InvalidRegistration,
    /// Property or unit form rejected locally
    InvalidListing,
    /// Password-reset form rejected locally
    InvalidPasswordReset,

    // Resource Not Found
    /// Entity detail not found
    NotFound,

    // System Errors
    /// No response from the API
    NetworkUnavailable,
    /// The API answered with a 5xx
    ServerError,
    /// The API answered 2xx with a body we could not read
    UnexpectedBody,
    /// Durable credential storage failed
    StorageFailure,
    /// Invalid client configuration
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::TokenDecode => "TOKEN_DECODE",
            Self::RefreshFailed => "REFRESH_FAILED",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidBooking => "INVALID_BOOKING",
            Self::InvalidReview => "INVALID_REVIEW",
            Self::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            Self::InvalidRegistration => "INVALID_REGISTRATION",
            Self::InvalidListing => "INVALID_LISTING",
            Self::InvalidPasswordReset => "INVALID_PASSWORD_RESET",

            Self::NotFound => "NOT_FOUND",

            Self::NetworkUnavailable => "NETWORK_UNAVAILABLE",
            Self::ServerError => "SERVER_ERROR",
            Self::UnexpectedBody => "UNEXPECTED_BODY",
            Self::StorageFailure => "STORAGE_FAILURE",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// All codes, in declaration order.
    pub const ALL: [ErrorCode; 17] = [
        Self::Unauthorized,
        Self::Forbidden,
        Self::TokenDecode,
        Self::RefreshFailed,
        Self::ValidationError,
        Self::InvalidBooking,
        Self::InvalidReview,
        Self::InvalidStatusTransition,
        Self::InvalidRegistration,
        Self::InvalidListing,
        Self::InvalidPasswordReset,
        Self::NotFound,
        Self::NetworkUnavailable,
        Self::ServerError,
        Self::UnexpectedBody,
        Self::StorageFailure,
        Self::ConfigError,
    ];

    /// Whether this failure forces the user back through the login page.
    pub const fn forces_login(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::RefreshFailed)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
