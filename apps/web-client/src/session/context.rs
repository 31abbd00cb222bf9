use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::shared::SessionShared;
use super::state::SessionState;
use crate::auth::tokens::{LoginRequest, TokenResponse};
use crate::auth::{decode, CredentialStore, SessionClaims, TokenPair};
use crate::error::ClientError;
use crate::http::endpoints;
use crate::http::{ApiRequest, AuthPipeline, Transport};
use crate::logging::pii::Redacted;
use crate::routes::{authorize, required_roles, GateDecision, Navigator};

/// Handle to the session. Clones share the same state, store and pipeline.
#[derive(Clone)]
pub struct SessionContext {
    shared: Arc<SessionShared>,
    api: Arc<AuthPipeline>,
}

impl SessionContext {
    /// New context in the `Checking` state; call [`initialize`](Self::initialize)
    /// to settle it from the credential store.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let shared = Arc::new(SessionShared::new(store, navigator));
        let api = Arc::new(AuthPipeline::new(transport, shared.clone()));
        shared.publish(SessionState::Checking);
        Self { shared, api }
    }

    /// Restore the session from stored credentials.
    ///
    /// Absent or unreadable credentials leave the session anonymous. A stored
    /// token that does not decode is cleared. Expiry is not checked here; a
    /// stale token is refreshed by the pipeline on its first 401.
    pub fn initialize(&self) -> SessionState {
        self.shared.publish(SessionState::Checking);
        let tokens = match self.shared.load_tokens() {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "credential store unreadable; starting anonymous");
                None
            }
        };

        let Some(tokens) = tokens else {
            debug!("no stored credentials");
            self.shared.restore(None, SessionState::Anonymous);
            return SessionState::Anonymous;
        };

        match decode(&tokens.access) {
            Ok(claims) => {
                info!(user_id = %claims.user_id, role = %claims.role, "session restored");
                let state = SessionState::Authenticated(claims);
                self.shared.restore(Some(tokens.access), state.clone());
                state
            }
            Err(e) => {
                warn!(error = %e, "stored access token unreadable; clearing credentials");
                self.shared.sign_out();
                SessionState::Anonymous
            }
        }
    }

    /// Authenticated request pipeline bound to this session.
    pub fn api(&self) -> &AuthPipeline {
        &self.api
    }

    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    pub fn user(&self) -> Option<SessionClaims> {
        self.shared.state().user().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state().is_loading()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.subscribe()
    }

    /// Wait until the startup check has finished and return the settled state.
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.shared.subscribe();
        let settled = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.shared.state())
    }

    /// Exchange credentials for a token pair and become `Authenticated`.
    ///
    /// All-or-nothing: on any failure the session is left exactly as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionClaims, ClientError> {
        let request = ApiRequest::post(endpoints::LOGIN)
            .json(&LoginRequest { username, password })?
            .anonymous();
        let response: TokenResponse = self.api.fetch_json(request).await.map_err(|e| {
            warn!(user = %Redacted(username), code = %e.code(), "login rejected");
            e
        })?;

        let tokens = TokenPair::from(response);
        let claims = decode(&tokens.access)?;
        self.shared.install(&tokens, claims.clone())?;
        self.api.abandon_refresh();
        info!(user_id = %claims.user_id, role = %claims.role, "signed in");
        Ok(claims)
    }

    /// Drop credentials and become `Anonymous`. Cannot fail.
    pub fn logout(&self) {
        self.shared.sign_out();
        self.api.abandon_refresh();
        info!("signed out");
    }

    /// Gate decision for `location` against the current session.
    pub fn guard(&self, location: &str) -> GateDecision {
        let Some(allowed) = required_roles(location) else {
            return GateDecision::Render;
        };
        let state = self.shared.state();
        authorize(state.is_loading(), state.user(), allowed, location)
    }

    /// Like [`guard`](Self::guard), performing any redirect through the navigator.
    /// `Render` and `Pending` leave the navigator untouched.
    pub fn navigate(&self, location: &str) -> GateDecision {
        let decision = self.guard(location);
        if let GateDecision::Redirect(destination) = &decision {
            self.shared.redirect(destination.clone());
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use client_test_support::tokens::{mint_access_token, mint_token_without_role, refresh_token};
    use serde_json::json;

    use super::*;
    use crate::auth::{MemoryCredentialStore, Role};
    use crate::http::{Method, ScriptedTransport, StatusCode};
    use crate::routes::RecordingNavigator;

    fn context(store: Arc<MemoryCredentialStore>) -> (SessionContext, ScriptedTransport) {
        let transport = ScriptedTransport::new();
        let ctx = SessionContext::new(
            store,
            Arc::new(transport.clone()),
            Arc::new(RecordingNavigator::new()),
        );
        (ctx, transport)
    }

    #[test]
    fn starts_checking() {
        let (ctx, _) = context(Arc::new(MemoryCredentialStore::new()));
        assert_eq!(ctx.state(), SessionState::Checking);
        assert!(ctx.is_loading());
        assert_eq!(ctx.guard("/profile"), GateDecision::Pending);
    }

    #[test]
    fn restores_stored_session() {
        let token = mint_access_token(3, "kamau", "HOST");
        let store = Arc::new(MemoryCredentialStore::with_tokens(TokenPair::new(
            token.clone(),
            Some(refresh_token("r")),
        )));
        let (ctx, _) = context(store);

        let state = ctx.initialize();
        assert_eq!(state.user().map(|c| c.role), Some(Role::Host));
        assert_eq!(ctx.shared.bearer(), Some(token));
        assert_eq!(ctx.guard("/host/bookings"), GateDecision::Render);
    }

    #[test]
    fn undecodable_stored_token_is_cleared() {
        let store = Arc::new(MemoryCredentialStore::with_tokens(TokenPair::new(
            mint_token_without_role(3, "kamau"),
            None,
        )));
        let (ctx, _) = context(store.clone());

        assert_eq!(ctx.initialize(), SessionState::Anonymous);
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn failed_login_leaves_state_untouched() {
        let (ctx, transport) = context(Arc::new(MemoryCredentialStore::new()));
        ctx.initialize();
        transport.reply(
            Method::POST,
            endpoints::LOGIN,
            StatusCode::UNAUTHORIZED,
            json!({"detail": "No active account found with the given credentials"}),
        );

        let err = ctx.login("kamau", "wrong").await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized { .. }));
        assert_eq!(ctx.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn settled_waits_for_initialize() {
        let (ctx, _) = context(Arc::new(MemoryCredentialStore::new()));
        let waiter = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.settled().await })
        };
        tokio::task::yield_now().await;
        ctx.initialize();
        assert_eq!(waiter.await.unwrap(), SessionState::Anonymous);
    }
}
