//! Process-wide session cell shared by the context and the request pipeline.
//!
//! Holds the credential store, the bearer token attached to outgoing requests
//! and the published session state. Only the session context and the pipeline
//! write to it; everything else reads through [`SessionShared::state`] or a
//! subscription.
//!
//! Every sign-in and sign-out advances the session epoch. Work started under one
//! epoch (a token refresh) may only touch the session while that epoch holds.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::warn;

use super::state::SessionState;
use crate::auth::{CredentialStore, SessionClaims, StoreError, TokenPair};
use crate::routes::{Destination, Navigator};

pub struct SessionShared {
    store: Arc<dyn CredentialStore>,
    bearer: RwLock<Option<String>>,
    state: watch::Sender<SessionState>,
    navigator: Arc<dyn Navigator>,
    epoch: Mutex<u64>,
}

impl SessionShared {
    pub(crate) fn new(store: Arc<dyn CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            store,
            bearer: RwLock::new(None),
            state,
            navigator,
            epoch: Mutex::new(0),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Access token currently attached to outgoing requests.
    pub fn bearer(&self) -> Option<String> {
        self.bearer.read().clone()
    }

    pub(crate) fn load_tokens(&self) -> Result<Option<TokenPair>, StoreError> {
        self.store.load()
    }

    pub(crate) fn publish(&self, state: SessionState) {
        self.state.send_replace(state);
    }

    pub(crate) fn attach(&self, access: Option<String>) {
        *self.bearer.write() = access;
    }

    pub(crate) fn epoch(&self) -> u64 {
        *self.epoch.lock()
    }

    /// Settle from stored credentials: attach `access` and publish `state`.
    pub(crate) fn restore(&self, access: Option<String>, state: SessionState) {
        let mut epoch = self.epoch.lock();
        self.attach(access);
        self.publish(state);
        *epoch += 1;
    }

    /// Persist `tokens` and switch to `Authenticated(claims)` as a new session.
    /// Nothing changes if the store rejects the write.
    pub(crate) fn install(&self, tokens: &TokenPair, claims: SessionClaims) -> Result<(), StoreError> {
        let mut epoch = self.epoch.lock();
        self.write_tokens(tokens, claims)?;
        *epoch += 1;
        Ok(())
    }

    /// Rotate tokens within the session that was current at `expected`.
    /// `Ok(false)` means the session changed meanwhile and nothing was written.
    pub(crate) fn install_at(
        &self,
        expected: u64,
        tokens: &TokenPair,
        claims: SessionClaims,
    ) -> Result<bool, StoreError> {
        let epoch = self.epoch.lock();
        if *epoch != expected {
            return Ok(false);
        }
        self.write_tokens(tokens, claims)?;
        Ok(true)
    }

    /// Drop all credentials and become `Anonymous`. Cannot fail: a store that
    /// refuses to clear is logged and the in-memory session is still dropped.
    pub(crate) fn sign_out(&self) {
        let mut epoch = self.epoch.lock();
        self.drop_credentials();
        *epoch += 1;
    }

    /// Sign out only if the session is still the one current at `expected`.
    pub(crate) fn sign_out_at(&self, expected: u64) -> bool {
        let mut epoch = self.epoch.lock();
        if *epoch != expected {
            return false;
        }
        self.drop_credentials();
        *epoch += 1;
        true
    }

    fn write_tokens(&self, tokens: &TokenPair, claims: SessionClaims) -> Result<(), StoreError> {
        self.store.save(tokens)?;
        self.attach(Some(tokens.access.clone()));
        self.publish(SessionState::Authenticated(claims));
        Ok(())
    }

    fn drop_credentials(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored credentials");
        }
        self.attach(None);
        self.publish(SessionState::Anonymous);
    }

    pub(crate) fn redirect(&self, destination: Destination) {
        self.navigator.navigate(destination);
    }
}
