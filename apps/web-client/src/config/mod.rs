//! Client configuration.

pub mod client;

pub use client::ClientConfig;
