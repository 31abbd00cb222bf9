//! Error handling for the web client.

pub mod api_body;
pub mod error_code;

pub use api_body::ApiErrorBody;
pub use error_code::ErrorCode;
