use std::fmt;

use serde::{Deserialize, Serialize};

use crate::logging::pii::token_fingerprint;

/// Access token plus the optional refresh token issued alongside it.
///
/// A refresh token cannot exist on its own: the type has no way to express it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: Option<String>) -> Self {
        Self {
            access: access.into(),
            refresh,
        }
    }

    /// Same refresh token, rotated access token.
    pub fn with_access(&self, access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: self.refresh.clone(),
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &token_fingerprint(&self.access))
            .field("refresh", &self.refresh.as_deref().map(token_fingerprint))
            .finish()
    }
}

/// Body of `POST /auth/token/`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login answer.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl From<TokenResponse> for TokenPair {
    fn from(r: TokenResponse) -> Self {
        TokenPair::new(r.access, r.refresh.filter(|t| !t.is_empty()))
    }
}

/// Body of `POST /auth/token/refresh/`.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Successful refresh answer. Any rotated refresh token is ignored: the stored
/// one stays in place.
#[derive(Debug, Deserialize)]
pub struct AccessResponse {
    pub access: String,
}
