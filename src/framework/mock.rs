//! # Mock Transport
//!
//! Scripted [`Transport`] for exercising resources, the API client and the
//! action dispatcher without a server.
//!
//! A request consumes the oldest expectation with the same method and path,
//! so replies for one endpoint are FIFO while independent resources may fetch
//! in any order. A request with no matching expectation gets a network error
//! back and is remembered, so [`MockTransport::verify`] fails the test
//! afterwards instead of panicking inside a spawned fetch task.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use tokio::sync::{oneshot, watch};

use crate::http::{ApiClient, ApiError, ApiRequest, RawResponse, SessionGuard, Transport};

type Reply = Result<RawResponse, ApiError>;

enum Outcome {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

struct Expectation {
    method: Method,
    path: String,
    outcome: Outcome,
}

/// A transport with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mock = Arc::new(MockTransport::new());
/// mock.expect_get("/api/departments").return_json(json!([{"id": 1, "name": "HR"}]));
///
/// let client = mock.client(SessionGuard::new());
/// // Use client in tests...
/// mock.verify();
/// ```
pub struct MockTransport {
    expectations: Mutex<VecDeque<Expectation>>,
    unexpected: Mutex<Vec<String>>,
    received: watch::Sender<Vec<ApiRequest>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            expectations: Mutex::new(VecDeque::new()),
            unexpected: Mutex::new(Vec::new()),
            received: watch::Sender::new(Vec::new()),
        }
    }

    /// An [`ApiClient`] backed by this mock.
    pub fn client(self: &Arc<Self>, session: SessionGuard) -> ApiClient {
        ApiClient::new(self.clone(), session)
    }

    pub fn expect(&self, method: Method, path: &str) -> ExpectationBuilder<'_> {
        ExpectationBuilder { mock: self, method, path: path.to_owned() }
    }

    pub fn expect_get(&self, path: &str) -> ExpectationBuilder<'_> {
        self.expect(Method::GET, path)
    }

    pub fn expect_post(&self, path: &str) -> ExpectationBuilder<'_> {
        self.expect(Method::POST, path)
    }

    pub fn expect_put(&self, path: &str) -> ExpectationBuilder<'_> {
        self.expect(Method::PUT, path)
    }

    /// Every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.received.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.received.borrow().len()
    }

    /// Waits until at least `count` requests have arrived.
    pub async fn wait_for_requests(&self, count: usize) {
        let mut observer = self.received.subscribe();
        let _ = observer.wait_for(|log| log.len() >= count).await;
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let unexpected = self.unexpected.lock().unwrap();
        if !unexpected.is_empty() {
            panic!("Unexpected requests: {:?}", *unexpected);
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            let pending: Vec<String> = exps.iter().map(|e| format!("{} {}", e.method, e.path)).collect();
            panic!("Not all expectations were met. {} remaining: {:?}", exps.len(), pending);
        }
    }

    fn push(&self, method: Method, path: String, outcome: Outcome) {
        self.expectations.lock().unwrap().push_back(Expectation { method, path, outcome });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let label = format!("{} {}", request.method, request.path);
        // Take the expectation before logging so a waiter woken by the log
        // sees the queue already advanced.
        let expectation = {
            let mut exps = self.expectations.lock().unwrap();
            exps.iter()
                .position(|e| e.method == request.method && e.path == request.path)
                .and_then(|index| exps.remove(index))
        };
        self.received.send_modify(|log| log.push(request));

        match expectation {
            Some(Expectation { outcome: Outcome::Ready(reply), .. }) => reply,
            Some(Expectation { outcome: Outcome::Deferred(pending), .. }) => pending
                .await
                .unwrap_or_else(|_| Err(ApiError::Network(format!("deferred reply for {label} dropped")))),
            None => {
                self.unexpected.lock().unwrap().push(label.clone());
                Err(ApiError::Network(format!("unexpected request {label}")))
            }
        }
    }
}

/// Builder for one expected request.
pub struct ExpectationBuilder<'a> {
    mock: &'a MockTransport,
    method: Method,
    path: String,
}

impl ExpectationBuilder<'_> {
    pub fn return_json(self, body: Value) {
        self.return_status(200, body);
    }

    pub fn return_status(self, status: u16, body: Value) {
        self.reply(Ok(RawResponse::json(status, &body)));
    }

    /// A binary body, optionally with a `Content-Disposition` header.
    pub fn return_bytes(self, content_disposition: Option<&str>, body: impl Into<Bytes>) {
        self.reply(Ok(RawResponse {
            status: 200,
            content_disposition: content_disposition.map(str::to_owned),
            body: body.into(),
        }));
    }

    pub fn return_network_error(self, message: &str) {
        self.reply(Err(ApiError::Network(message.to_owned())));
    }

    /// Holds the reply until the returned handle is released.
    pub fn deferred(self) -> DeferredReply {
        let (sender, receiver) = oneshot::channel();
        self.mock.push(self.method, self.path, Outcome::Deferred(receiver));
        DeferredReply { sender }
    }

    fn reply(self, reply: Reply) {
        self.mock.push(self.method, self.path, Outcome::Ready(reply));
    }
}

/// Releases a reply queued with [`ExpectationBuilder::deferred`].
pub struct DeferredReply {
    sender: oneshot::Sender<Reply>,
}

impl DeferredReply {
    pub fn respond_json(self, body: Value) {
        self.respond_status(200, body);
    }

    pub fn respond_status(self, status: u16, body: Value) {
        let _ = self.sender.send(Ok(RawResponse::json(status, &body)));
    }

    pub fn fail(self, error: ApiError) {
        let _ = self.sender.send(Err(error));
    }
}
