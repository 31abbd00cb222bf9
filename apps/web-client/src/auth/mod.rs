//! Client-side credentials: token pair, claims, decoding and durable storage.

pub mod claims;
pub mod decoder;
pub mod store;
pub mod tokens;

pub use claims::{Role, SessionClaims};
pub use decoder::{decode, DecodeError};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError};
pub use tokens::TokenPair;
