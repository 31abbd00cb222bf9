//! A session wired to a scripted API, an in-memory store and a recording navigator.

use std::sync::Arc;

use client_test_support::tokens::{mint_access_token, refresh_token};
use web_client::auth::{CredentialStore, MemoryCredentialStore, TokenPair};
use web_client::http::ScriptedTransport;
use web_client::routes::RecordingNavigator;
use web_client::session::{build_session, SessionContext};

pub struct Harness {
    pub transport: ScriptedTransport,
    pub store: Arc<MemoryCredentialStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub session: SessionContext,
}

impl Harness {
    /// Session restored from `tokens` (or anonymous when `None`).
    pub fn with_tokens(tokens: Option<TokenPair>) -> Self {
        let transport = ScriptedTransport::new();
        let store = Arc::new(match tokens {
            Some(tokens) => MemoryCredentialStore::with_tokens(tokens),
            None => MemoryCredentialStore::new(),
        });
        let navigator = Arc::new(RecordingNavigator::new());
        let session = build_session()
            .with_store(store.clone())
            .with_transport(Arc::new(transport.clone()))
            .with_navigator(navigator.clone())
            .build()
            .expect("session should build");
        Self {
            transport,
            store,
            navigator,
            session,
        }
    }

    pub fn anonymous() -> Self {
        Self::with_tokens(None)
    }

    /// Signed in with a fresh access token and a refresh token.
    pub fn signed_in(user_id: i64, username: &str, role: &str) -> Self {
        Self::with_tokens(Some(TokenPair::new(
            mint_access_token(user_id, username, role),
            Some(refresh_token(username)),
        )))
    }

    pub fn stored(&self) -> Option<TokenPair> {
        self.store.load().expect("memory store never fails")
    }
}
