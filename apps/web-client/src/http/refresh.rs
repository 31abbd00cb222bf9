//! The token-refresh call and the slot that lets concurrent 401s share it.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use thiserror::Error;

use super::endpoints;
use super::transport::{ApiRequest, StatusCode, Transport, TransportError};
use crate::auth::tokens::{AccessResponse, RefreshRequest};
use crate::auth::DecodeError;
use crate::errors::ApiErrorBody;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("refresh rejected with {status}")]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("malformed refresh response: {0}")]
    MalformedResponse(String),
    #[error("refreshed token unreadable: {0}")]
    Decode(#[from] DecodeError),
    #[error("could not persist refreshed token: {0}")]
    Storage(String),
    #[error("session changed while the token was refreshing")]
    Superseded,
}

pub(crate) type RefreshOutcome = Result<String, RefreshError>;
pub(crate) type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Holds the in-flight refresh, if any, tagged with the session epoch it was
/// started under. Cloning shares the slot.
#[derive(Clone, Default)]
pub(crate) struct RefreshSlot {
    inflight: Arc<Mutex<Option<(u64, SharedRefresh)>>>,
}

impl RefreshSlot {
    /// Join the refresh already running for `epoch`, or start one with `start`.
    /// A refresh left over from an earlier epoch is never joined.
    pub(crate) fn join_or_start(
        &self,
        epoch: u64,
        start: impl FnOnce() -> BoxFuture<'static, RefreshOutcome>,
    ) -> (SharedRefresh, bool) {
        let mut slot = self.inflight.lock();
        if let Some((started_at, existing)) = slot.as_ref() {
            if *started_at == epoch {
                return (existing.clone(), false);
            }
        }
        let shared = start().shared();
        *slot = Some((epoch, shared.clone()));
        (shared, true)
    }

    /// Empty the slot if it still holds the refresh started under `epoch`.
    pub(crate) fn clear_if(&self, epoch: u64) {
        let mut slot = self.inflight.lock();
        if matches!(slot.as_ref(), Some((started_at, _)) if *started_at == epoch) {
            slot.take();
        }
    }

    pub(crate) fn clear(&self) {
        self.inflight.lock().take();
    }

    #[cfg(test)]
    pub(crate) fn is_idle(&self) -> bool {
        self.inflight.lock().is_none()
    }
}

/// POST the refresh token and return the new access token.
pub(crate) async fn request_access(
    transport: &dyn Transport,
    refresh_token: &str,
) -> RefreshOutcome {
    let request = ApiRequest::post(endpoints::TOKEN_REFRESH)
        .json(&RefreshRequest {
            refresh: refresh_token,
        })
        .map_err(|e| RefreshError::MalformedResponse(e.to_string()))?
        .anonymous();
    let response = transport.send(&request.prepare(None)).await?;
    if !response.is_success() {
        let body = ApiErrorBody::from_bytes(&response.body);
        return Err(RefreshError::Rejected {
            status: response.status,
            detail: body.detail().map(str::to_owned),
        });
    }
    let access: AccessResponse = serde_json::from_slice(&response.body)
        .map_err(|e| RefreshError::MalformedResponse(e.to_string()))?;
    if access.access.trim().is_empty() {
        return Err(RefreshError::MalformedResponse("empty access token".to_string()));
    }
    Ok(access.access)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::http::scripted::ScriptedTransport;
    use crate::http::transport::{ApiResponse, Method};

    #[tokio::test]
    async fn slot_shares_one_future() {
        let slot = RefreshSlot::default();
        let starts = Arc::new(AtomicUsize::new(0));

        let make = |starts: Arc<AtomicUsize>| {
            move || {
                starts.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, RefreshError>("new-access".to_string()) }.boxed()
            }
        };
        let (first, started_first) = slot.join_or_start(1, make(starts.clone()));
        let (second, started_second) = slot.join_or_start(1, make(starts.clone()));

        assert!(started_first);
        assert!(!started_second);
        assert_eq!(first.await, Ok("new-access".to_string()));
        assert_eq!(second.await, Ok("new-access".to_string()));
        assert_eq!(starts.load(Ordering::SeqCst), 1);

        slot.clear();
        assert!(slot.is_idle());
    }

    #[tokio::test]
    async fn slot_never_joins_an_earlier_session() {
        let slot = RefreshSlot::default();
        let (_stale, _) = slot.join_or_start(1, || futures::future::pending().boxed());

        let (fresh, started) =
            slot.join_or_start(2, || async { Ok("second-session".to_string()) }.boxed());
        assert!(started);
        assert_eq!(fresh.await, Ok("second-session".to_string()));

        // the earlier refresh finishing must not evict the newer one
        slot.clear_if(1);
        assert!(!slot.is_idle());
        slot.clear_if(2);
        assert!(slot.is_idle());
    }

    #[tokio::test]
    async fn request_access_reads_new_token() {
        let transport = ScriptedTransport::new();
        transport.reply(
            Method::POST,
            endpoints::TOKEN_REFRESH,
            StatusCode::OK,
            json!({"access": "fresh"}),
        );
        assert_eq!(request_access(&transport, "r1").await, Ok("fresh".to_string()));

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, Some(json!({"refresh": "r1"})));
        assert_eq!(sent[0].authorization, None);
    }

    #[tokio::test]
    async fn request_access_failures() {
        let transport = ScriptedTransport::new();
        transport.reply(
            Method::POST,
            endpoints::TOKEN_REFRESH,
            StatusCode::UNAUTHORIZED,
            json!({"detail": "Token is invalid or expired"}),
        );
        assert_eq!(
            request_access(&transport, "stale").await,
            Err(RefreshError::Rejected {
                status: StatusCode::UNAUTHORIZED,
                detail: Some("Token is invalid or expired".to_string()),
            })
        );

        transport.respond(Method::POST, endpoints::TOKEN_REFRESH, |_| {
            Ok(ApiResponse::new(StatusCode::OK, "{}"))
        });
        assert!(matches!(
            request_access(&transport, "r").await,
            Err(RefreshError::MalformedResponse(_))
        ));

        transport.fail(Method::POST, endpoints::TOKEN_REFRESH, TransportError::Timeout);
        assert_eq!(
            request_access(&transport, "r").await,
            Err(RefreshError::Transport(TransportError::Timeout))
        );
    }
}
