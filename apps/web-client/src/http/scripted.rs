//! In-memory transport that serves scripted replies and records every request.
//!
//! Used by the test suites and for offline runs of the client. Routes are
//! matched on exact method and path; the most recently registered route wins,
//! so a test can re-script an endpoint halfway through. Unmatched requests get
//! a 404 with a DRF-style `detail` body.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use super::transport::{
    ApiResponse, Method, PreparedRequest, StatusCode, Transport, TransportError,
};

type Responder =
    Arc<dyn Fn(&PreparedRequest) -> Result<ApiResponse, TransportError> + Send + Sync>;

struct Route {
    method: Method,
    path: String,
    responder: Responder,
}

#[derive(Default)]
struct Script {
    routes: Vec<Route>,
    latency: HashMap<(Method, String), Duration>,
    log: Vec<PreparedRequest>,
}

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve replies computed from the request.
    pub fn respond(
        &self,
        method: Method,
        path: &str,
        responder: impl Fn(&PreparedRequest) -> Result<ApiResponse, TransportError>
            + Send
            + Sync
            + 'static,
    ) -> &Self {
        self.script.lock().routes.push(Route {
            method,
            path: path.to_string(),
            responder: Arc::new(responder),
        });
        self
    }

    /// Always answer `status` with a JSON body.
    pub fn reply(&self, method: Method, path: &str, status: StatusCode, body: Value) -> &Self {
        let response = ApiResponse::from_json(status, &body);
        self.respond(method, path, move |_| Ok(response.clone()))
    }

    /// Answer with each response in turn, repeating the last one.
    pub fn reply_sequence(&self, method: Method, path: &str, responses: Vec<ApiResponse>) -> &Self {
        let queue = Mutex::new(responses);
        self.respond(method, path, move |_| {
            let mut queue = queue.lock();
            match queue.len() {
                0 => Err(TransportError::Other("empty reply sequence".to_string())),
                1 => Ok(queue[0].clone()),
                _ => Ok(queue.remove(0)),
            }
        })
    }

    /// Fail every request to this route without a response.
    pub fn fail(&self, method: Method, path: &str, error: TransportError) -> &Self {
        self.respond(method, path, move |_| Err(error.clone()))
    }

    /// Hold replies on this route for `latency` before answering.
    pub fn delay(&self, method: Method, path: &str, latency: Duration) -> &Self {
        self.script
            .lock()
            .latency
            .insert((method, path.to_string()), latency);
        self
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.script.lock().log.clone()
    }

    pub fn count(&self, method: &Method, path: &str) -> usize {
        self.script
            .lock()
            .log
            .iter()
            .filter(|r| &r.method == method && r.path == path)
            .count()
    }

    pub fn clear_log(&self) {
        self.script.lock().log.clear();
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<ApiResponse, TransportError> {
        let (responder, latency) = {
            let mut script = self.script.lock();
            script.log.push(request.clone());
            let responder = script
                .routes
                .iter()
                .rev()
                .find(|route| route.method == request.method && route.path == request.path)
                .map(|route| route.responder.clone());
            let latency = script
                .latency
                .get(&(request.method.clone(), request.path.clone()))
                .copied();
            (responder, latency)
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match responder {
            Some(responder) => responder(request),
            None => Ok(ApiResponse::from_json(
                StatusCode::NOT_FOUND,
                &json!({"detail": "Not found."}),
            )),
        }
    }
}
