use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
#[cfg(feature = "network")]
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::event::AppEvent;
use crate::trainer::protocol::{RequestKind, TrainerRequest};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("could not connect: {0}")]
    Connect(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("unreadable response: {0}")]
    Body(String),
    #[error("could not encode request: {0}")]
    Encode(String),
    #[error("built without network support")]
    Disabled,
}

/// POSTs a JSON body to a trainer endpoint and returns the JSON reply.
pub trait TrainerTransport: Send + Sync {
    fn post_json(&self, path: &str, body: &Value) -> Result<Value, TransportError>;
}

pub struct HttpTransport {
    base_url: String,
    #[cfg(feature = "network")]
    client: reqwest::blocking::Client,
}

#[cfg(feature = "network")]
impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[cfg(feature = "network")]
impl TrainerTransport for HttpTransport {
    fn post_json(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|e| TransportError::Body(e.to_string()))?;
        match serde_json::from_str::<Value>(&text) {
            Ok(value) if status.is_success() => Ok(value),
            // Error statuses that still carry an `{error}` body are protocol
            // errors, not transport failures.
            Ok(value) if value.get("error").is_some() => Ok(value),
            Ok(_) => Err(TransportError::Status(status.as_u16())),
            Err(_) if !status.is_success() => Err(TransportError::Status(status.as_u16())),
            Err(e) => Err(TransportError::Body(e.to_string())),
        }
    }
}

#[cfg(not(feature = "network"))]
impl HttpTransport {
    pub fn new(base_url: &str, _timeout: std::time::Duration) -> Result<Self, TransportError> {
        Ok(Self {
            base_url: base_url.to_string(),
        })
    }
}

#[cfg(not(feature = "network"))]
impl TrainerTransport for HttpTransport {
    fn post_json(&self, path: &str, _body: &Value) -> Result<Value, TransportError> {
        log::warn!("dropping {}{path}: no network support", self.base_url);
        Err(TransportError::Disabled)
    }
}

/// A request tagged with the session generation that issued it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outgoing {
    pub generation: u64,
    pub request: TrainerRequest,
}

#[derive(Clone, Debug)]
pub struct TrainerReply {
    pub generation: u64,
    pub kind: RequestKind,
    pub result: Result<Value, TransportError>,
}

/// Run one request to completion on the calling thread.
pub fn execute(transport: &dyn TrainerTransport, outgoing: Outgoing) -> TrainerReply {
    let kind = outgoing.request.kind();
    let result = outgoing
        .request
        .body()
        .map_err(|e| TransportError::Encode(e.to_string()))
        .and_then(|body| transport.post_json(kind.path(), &body));
    if let Err(e) = &result {
        log::warn!("trainer request {} failed: {e}", kind.path());
    }
    TrainerReply {
        generation: outgoing.generation,
        kind,
        result,
    }
}

/// Sends each request from a worker thread and posts the reply back to the
/// UI event loop, which stays responsive in the meantime.
pub struct Dispatcher {
    transport: Arc<dyn TrainerTransport>,
    tx: Sender<AppEvent>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn TrainerTransport>, tx: Sender<AppEvent>) -> Self {
        Self { transport, tx }
    }

    pub fn dispatch(&self, outgoing: Outgoing) {
        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        log::debug!(
            "dispatching {} (generation {})",
            outgoing.request.kind().path(),
            outgoing.generation
        );
        thread::spawn(move || {
            let reply = execute(transport.as_ref(), outgoing);
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send(AppEvent::Trainer(reply));
        });
    }
}
