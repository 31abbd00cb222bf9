//! Outbound API traffic: the transport seam, endpoint paths and the
//! authenticated pipeline with one-shot refresh-and-replay.

pub mod endpoints;
pub mod pipeline;
pub mod refresh;
pub mod scripted;
pub mod transport;

pub use pipeline::AuthPipeline;
pub use refresh::RefreshError;
pub use scripted::ScriptedTransport;
pub use transport::{
    ApiRequest, ApiResponse, AuthMode, Method, PreparedRequest, ReqwestTransport, StatusCode,
    Transport, TransportError,
};
