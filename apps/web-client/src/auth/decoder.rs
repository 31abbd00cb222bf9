//! Access-token decoding.
//!
//! The client reads the token payload for UI purposes only. Signatures are not
//! checked here and expiry is not enforced: both are the API's job. A token that
//! does not parse, or lacks a subject or role, is rejected as a whole.

use jsonwebtoken::dangerous::insecure_decode;
use jsonwebtoken::errors::ErrorKind;
use serde::Deserialize;
use thiserror::Error;
use time::OffsetDateTime;

use super::claims::{Role, SessionClaims};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("token is missing the `{0}` claim")]
    MissingClaim(&'static str),
    #[error("token carries unknown role `{0}`")]
    UnknownRole(String),
    #[error("token expiry {0} is out of range")]
    InvalidExpiry(i64),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSubject {
    Number(i64),
    Text(String),
}

impl RawSubject {
    fn into_text(self) -> String {
        match self {
            RawSubject::Number(n) => n.to_string(),
            RawSubject::Text(s) => s,
        }
    }
}

/// Payload as issued; every field optional so presence is checked explicitly.
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    user_id: Option<RawSubject>,
    #[serde(default)]
    sub: Option<RawSubject>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

impl TryFrom<RawClaims> for SessionClaims {
    type Error = DecodeError;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        let user_id = raw
            .user_id
            .or(raw.sub)
            .map(RawSubject::into_text)
            .filter(|s| !s.trim().is_empty())
            .ok_or(DecodeError::MissingClaim("user_id"))?;

        let role_text = raw
            .role
            .filter(|r| !r.trim().is_empty())
            .ok_or(DecodeError::MissingClaim("role"))?;
        let role = role_text.parse::<Role>().map_err(DecodeError::UnknownRole)?;

        let expires_at = raw
            .exp
            .map(|exp| {
                OffsetDateTime::from_unix_timestamp(exp).map_err(|_| DecodeError::InvalidExpiry(exp))
            })
            .transpose()?;

        Ok(SessionClaims {
            user_id,
            username: raw.username.filter(|s| !s.is_empty()),
            email: raw.email.filter(|s| !s.is_empty()),
            role,
            expires_at,
        })
    }
}

/// Decode an access token into claims without contacting the network.
pub fn decode(access_token: &str) -> Result<SessionClaims, DecodeError> {
    let token = access_token.trim();
    if token.is_empty() {
        return Err(DecodeError::Malformed("empty token".to_string()));
    }

    // Header and payload are parsed; the signature and `exp` are left to the API.
    let data = insecure_decode::<RawClaims>(token).map_err(|e| match e.kind() {
        ErrorKind::Json(inner) => {
            DecodeError::Malformed(format!("payload is not a claims object: {inner}"))
        }
        _ => DecodeError::Malformed(e.to_string()),
    })?;

    SessionClaims::try_from(data.claims)
}
