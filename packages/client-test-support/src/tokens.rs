//! Access-token minting for tests.
//!
//! Tokens are real HS256 JWTs signed with a throwaway secret, shaped like the
//! ones the rental API issues (`user_id`, `username`, `email`, `role`, `exp`).
//! The client never verifies the signature, so any secret works.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

const TEST_SECRET: &[u8] = b"client_test_secret_for_testing_purposes_only";

/// Default access-token lifetime used by [`mint_access_token`].
pub const ACCESS_TTL_SECS: i64 = 5 * 60;

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Mint a token carrying an arbitrary JSON payload.
pub fn mint_with_payload(payload: &Value) -> String {
    encode(
        &Header::default(),
        payload,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .expect("HS256 encoding of a JSON object cannot fail")
}

/// Mint a complete access token for `user_id` with the given role.
pub fn mint_access_token(user_id: i64, username: &str, role: &str) -> String {
    mint_with_payload(&json!({
        "token_type": "access",
        "user_id": user_id,
        "username": username,
        "email": format!("{username}@example.test"),
        "role": role,
        "exp": now_secs() + ACCESS_TTL_SECS,
    }))
}

/// Mint an access token whose `exp` lies in the past.
pub fn mint_expired_access_token(user_id: i64, username: &str, role: &str) -> String {
    mint_with_payload(&json!({
        "token_type": "access",
        "user_id": user_id,
        "username": username,
        "email": format!("{username}@example.test"),
        "role": role,
        "exp": now_secs() - 60,
    }))
}

/// Mint a token that decodes as JSON but carries no `role` claim.
pub fn mint_token_without_role(user_id: i64, username: &str) -> String {
    mint_with_payload(&json!({
        "user_id": user_id,
        "username": username,
        "exp": now_secs() + ACCESS_TTL_SECS,
    }))
}

/// An opaque refresh token; the client never looks inside it.
///
/// Deterministic per label so a test can rebuild the value it scripted.
pub fn refresh_token(label: &str) -> String {
    format!("refresh.{label}")
}
