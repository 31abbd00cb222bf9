//! Logging helpers shared by the client.

pub mod pii;
