#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod booking;
pub mod config;
pub mod dates;
pub mod error;
pub mod errors;
pub mod http;
pub mod logging;
pub mod routes;
pub mod services;
pub mod session;
pub mod view;

// Re-exports for public API
pub use auth::{
    decode, CredentialStore, DecodeError, FileCredentialStore, MemoryCredentialStore, Role,
    SessionClaims, StoreError, TokenPair,
};
pub use booking::{
    compute_nights, compute_total, fetch_unavailable_dates, Amount, AvailabilityCalendar,
    BookingDraft, BookingRejection, BookingStatus,
};
pub use config::ClientConfig;
pub use error::ClientError;
pub use errors::{ApiErrorBody, ErrorCode};
pub use http::{
    ApiRequest, ApiResponse, AuthPipeline, RefreshError, ReqwestTransport, ScriptedTransport,
    Transport, TransportError,
};
pub use routes::{authorize, Destination, GateDecision, Navigator, RecordingNavigator};
pub use session::{build_session, SessionBuilder, SessionContext, SessionState};
pub use view::ViewScope;

// Prelude for test convenience
pub mod prelude {
    pub use super::auth::*;
    pub use super::booking::*;
    pub use super::error::*;
    pub use super::http::*;
    pub use super::routes::*;
    pub use super::services::*;
    pub use super::session::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    client_test_support::logging::init();
}
