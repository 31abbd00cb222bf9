//! Client test support utilities
//!
//! This crate provides helpers shared by the web client's unit and integration
//! tests: unified logging initialization, unique test data and access-token
//! minting for a fake API.

pub mod logging;
pub mod tokens;
pub mod unique;
