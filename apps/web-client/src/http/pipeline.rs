//! Authenticated request pipeline.
//!
//! Every API call goes through [`AuthPipeline::execute`]. Bearer requests get
//! the current access token; a 401 on the first attempt triggers at most one
//! refresh followed by exactly one replay. Concurrent 401s share a single
//! in-flight refresh, and a request whose token was already rotated by someone
//! else replays with the new token without refreshing again. A refresh that
//! outlives its session (logout or a new login meanwhile) leaves the session
//! alone.

use std::sync::Arc;

use futures::future::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::endpoints;
use super::refresh::{request_access, RefreshError, RefreshOutcome, RefreshSlot};
use super::transport::{ApiRequest, ApiResponse, AuthMode, StatusCode, Transport};
use crate::auth::{decode, TokenPair};
use crate::error::ClientError;
use crate::routes::Destination;
use crate::session::SessionShared;

/// A request plus whether it has already been replayed once.
struct Attempt {
    request: ApiRequest,
    retried: bool,
}

impl Attempt {
    fn first(request: ApiRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }

    /// The single permitted replay; `None` once used.
    fn replay(self) -> Option<Self> {
        if self.retried {
            None
        } else {
            Some(Self {
                request: self.request,
                retried: true,
            })
        }
    }
}

pub struct AuthPipeline {
    transport: Arc<dyn Transport>,
    session: Arc<SessionShared>,
    refresh: RefreshSlot,
}

impl AuthPipeline {
    pub(crate) fn new(transport: Arc<dyn Transport>, session: Arc<SessionShared>) -> Self {
        Self {
            transport,
            session,
            refresh: RefreshSlot::default(),
        }
    }

    /// Send `request`, recovering once from an expired access token.
    ///
    /// Any response is returned as-is except a first-attempt 401 on a bearer
    /// request, which is replaced by the replayed response. Fails with
    /// `RefreshFailed` when the refresh itself fails; credentials are cleared
    /// and the user is sent to login in that case.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let attempt = Attempt::first(request);
        let sent_with = self.session.bearer();
        let response = self.dispatch(&attempt, sent_with.as_deref()).await?;

        if response.status != StatusCode::UNAUTHORIZED
            || attempt.request.auth == AuthMode::Anonymous
            || endpoints::is_credential_endpoint(&attempt.request.path)
        {
            return Ok(response);
        }
        let Some(replay) = attempt.replay() else {
            return Ok(response);
        };

        match self.fresh_access(sent_with.as_deref()).await? {
            Some(access) => self.dispatch(&replay, Some(&access)).await,
            None => {
                debug!(path = %replay.request.path, "401 without refresh token; sending to login");
                self.session.redirect(Destination::login());
                Ok(response)
            }
        }
    }

    async fn dispatch(
        &self,
        attempt: &Attempt,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let prepared = attempt.request.prepare(bearer);
        debug!(
            method = %prepared.method,
            path = %prepared.path,
            retried = attempt.retried,
            authenticated = prepared.authorization.is_some(),
            "dispatching request"
        );
        let response = self.transport.send(&prepared).await.map_err(|e| {
            warn!(path = %prepared.path, error = %e, "request failed without response");
            e
        })?;
        debug!(path = %prepared.path, status = response.status.as_u16(), "response received");
        Ok(response)
    }

    /// An access token newer than `sent_with`, refreshing if nobody has yet.
    /// `Ok(None)` means there is no refresh token to use.
    async fn fresh_access(&self, sent_with: Option<&str>) -> Result<Option<String>, ClientError> {
        if let Some(current) = self.session.bearer() {
            if Some(current.as_str()) != sent_with {
                debug!("access token already rotated; replaying without refresh");
                return Ok(Some(current));
            }
        }

        let refresh_token = match self.session.load_tokens() {
            Ok(tokens) => tokens.and_then(|t| t.refresh),
            Err(e) => {
                warn!(error = %e, "could not read stored refresh token");
                None
            }
        };
        let Some(refresh_token) = refresh_token else {
            return Ok(None);
        };

        let epoch = self.session.epoch();
        let (shared, started) = self.refresh.join_or_start(epoch, || {
            let transport = self.transport.clone();
            let session = self.session.clone();
            let slot = self.refresh.clone();
            async move {
                let outcome = run_refresh(transport.as_ref(), &session, epoch, refresh_token).await;
                slot.clear_if(epoch);
                outcome
            }
            .boxed()
        });
        if !started {
            debug!("joining in-flight token refresh");
        }
        Ok(Some(shared.await?))
    }

    /// Forget any in-flight refresh; callers already waiting on it still get
    /// its outcome.
    pub(crate) fn abandon_refresh(&self) {
        self.refresh.clear();
    }

    /// GET `path` and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.fetch_json(ApiRequest::get(path)).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch_json(ApiRequest::post(path).json(body)?).await
    }

    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch_json(ApiRequest::patch(path).json(body)?).await
    }

    /// Execute and decode a successful JSON body; failures become `ClientError`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let path = request.path.clone();
        let response = self.execute(request).await?;
        classify(&path, response)?.json()
    }

    /// Execute where the body of a successful answer does not matter.
    pub async fn send_no_content(&self, request: ApiRequest) -> Result<(), ClientError> {
        let path = request.path.clone();
        let response = self.execute(request).await?;
        classify(&path, response).map(|_| ())
    }
}

fn classify(path: &str, response: ApiResponse) -> Result<ApiResponse, ClientError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ClientError::from_response(path, &response))
    }
}

/// One refresh cycle including its side effects on the session, applied only
/// while the session started at `epoch` is still current.
async fn run_refresh(
    transport: &dyn Transport,
    session: &SessionShared,
    epoch: u64,
    refresh_token: String,
) -> RefreshOutcome {
    let outcome = match request_access(transport, &refresh_token).await {
        Ok(access) => match decode(&access) {
            Ok(claims) => {
                let tokens = TokenPair::new(access.clone(), Some(refresh_token));
                match session.install_at(epoch, &tokens, claims) {
                    Ok(true) => Ok(access),
                    Ok(false) => Err(RefreshError::Superseded),
                    Err(e) => Err(RefreshError::Storage(e.to_string())),
                }
            }
            Err(e) => Err(RefreshError::from(e)),
        },
        Err(e) => Err(e),
    };

    match &outcome {
        Ok(_) => info!("access token refreshed"),
        Err(RefreshError::Superseded) => {
            info!("session changed during token refresh; discarding new token");
        }
        Err(e) => {
            if session.sign_out_at(epoch) {
                warn!(error = %e, "token refresh failed; signing out");
                session.redirect(Destination::login());
            } else {
                info!(error = %e, "token refresh failed after the session changed; ignoring");
            }
        }
    }
    outcome
}
