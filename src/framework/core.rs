//! # Resource Engine
//!
//! Generic building blocks for remote, read-mostly data.
//!
//! ## Key Types
//!
//! - [`RemoteResource`]: The trait every fetchable resource implements.
//! - [`ResourceActor`]: The actor that owns one resource's fetch state.
//! - [`ResourceHandle`]: The cloneable handle views and actions use.
//! - [`ResourceSnapshot`]: What observers see (value, state, error, generation).
//! - [`FrameworkError`]: Engine errors (ActorClosed, NotReady, Patch).

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use super::trigger::FetchTrigger;
use crate::http::{ApiError, SessionKey};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// A piece of server data bound to one or more endpoints.
///
/// The actor owns all state transitions; an implementation only describes how
/// to fetch the value, how to apply an optional local patch, and how a fetch
/// failure is worded for the user.
///
/// `Context` carries late-bound dependencies (typically an
/// [`ApiClient`](crate::http::ApiClient)) injected through
/// [`ResourceActor::run`].
#[async_trait]
pub trait RemoteResource: Send + Sync + 'static {
    type Value: Clone + Debug + Send + Sync + 'static;

    /// Local mutation applied without a refetch. Use `()` when unsupported.
    type Patch: Debug + Send + 'static;

    type Context: Clone + Send + Sync + 'static;

    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn fetch(&self, ctx: &Self::Context) -> Result<Self::Value, ApiError>;

    /// Applies `patch` to a ready value.
    fn apply_patch(&self, _value: &mut Self::Value, patch: Self::Patch) -> Result<(), String> {
        Err(format!("{} does not support local patches ({patch:?})", self.name()))
    }

    /// User-facing message stored in the snapshot when a fetch fails.
    fn describe_error(&self, error: &ApiError) -> String {
        error.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Observable state of one resource.
///
/// `value` is `None` unless `state` is [`FetchState::Ready`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSnapshot<V> {
    pub value: Option<V>,
    pub state: FetchState,
    pub error: Option<String>,
    pub generation: u64,
}

impl<V> ResourceSnapshot<V> {
    fn idle(generation: u64) -> Self {
        Self { value: None, state: FetchState::Idle, error: None, generation }
    }

    fn loading(generation: u64) -> Self {
        Self { value: None, state: FetchState::Loading, error: None, generation }
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    /// Ready or Error.
    pub fn is_settled(&self) -> bool {
        matches!(self.state, FetchState::Ready | FetchState::Error)
    }
}

// =============================================================================
// 2. MESSAGES & ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Resource not ready: {0}")]
    NotReady(String),
    #[error("Patch rejected: {0}")]
    Patch(String),
}

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Messages handled by [`ResourceActor`].
///
/// `Completed` is sent by the actor's own fetch tasks, never by handles.
#[derive(Debug)]
pub enum ResourceRequest<R: RemoteResource> {
    Refresh {
        respond_to: Response<u64>,
    },
    Patch {
        patch: R::Patch,
        respond_to: Response<R::Value>,
    },
    Invalidate {
        respond_to: Response<()>,
    },
    Completed {
        generation: u64,
        result: Result<R::Value, ApiError>,
    },
}

// =============================================================================
// 3. THE ACTOR
// =============================================================================

/// Owns the fetch state of a single resource.
///
/// Every fetch is tagged with a generation number. Only a response whose
/// generation matches the latest issued one may update the snapshot; anything
/// older is dropped, so responses landing out of order never overwrite newer
/// data.
pub struct ResourceActor<R: RemoteResource> {
    resource: Arc<R>,
    receiver: mpsc::Receiver<ResourceRequest<R>>,
    loopback: mpsc::WeakSender<ResourceRequest<R>>,
    snapshot: watch::Sender<ResourceSnapshot<R::Value>>,
    generation: u64,
    session: Option<SessionKey>,
}

impl<R: RemoteResource> ResourceActor<R> {
    pub fn new(resource: R, buffer_size: usize) -> (Self, ResourceHandle<R>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (snapshot, observer) = watch::channel(ResourceSnapshot::idle(0));
        let actor = Self {
            resource: Arc::new(resource),
            receiver,
            loopback: sender.downgrade(),
            snapshot,
            generation: 0,
            session: None,
        };
        (actor, ResourceHandle { sender, snapshot: observer })
    }

    /// Runs the event loop until every handle is dropped.
    ///
    /// The first fetch is issued as soon as `trigger` is satisfied. When the
    /// trigger turns false or its key changes, the value is discarded and any
    /// fetch still in flight is invalidated.
    pub async fn run(mut self, context: R::Context, mut trigger: FetchTrigger) {
        let resource = self.resource.name().to_owned();
        info!(%resource, "Resource started");

        self.session = trigger.current();
        if self.session.is_some() {
            self.start_fetch(&resource, &context);
        }

        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else { break };
                    self.handle(msg, &resource, &context);
                }
                key = trigger.changed() => self.on_trigger(key, &resource, &context),
            }
        }

        info!(%resource, generation = self.generation, "Shutdown");
    }

    fn handle(&mut self, msg: ResourceRequest<R>, resource: &str, context: &R::Context) {
        match msg {
            ResourceRequest::Refresh { respond_to } => {
                if self.session.is_none() {
                    debug!(resource, "Refresh ignored, trigger not satisfied");
                    let _ = respond_to.send(Err(FrameworkError::NotReady(resource.to_owned())));
                    return;
                }
                let generation = self.start_fetch(resource, context);
                let _ = respond_to.send(Ok(generation));
            }
            ResourceRequest::Patch { patch, respond_to } => {
                let current = self.snapshot.borrow().clone();
                let Some(mut value) = current.value.filter(|_| current.state == FetchState::Ready) else {
                    warn!(resource, ?patch, state = ?current.state, "Patch on a resource that is not ready");
                    let _ = respond_to.send(Err(FrameworkError::NotReady(resource.to_owned())));
                    return;
                };
                debug!(resource, ?patch, "Patch");
                match self.resource.apply_patch(&mut value, patch) {
                    Ok(()) => {
                        self.snapshot.send_replace(ResourceSnapshot {
                            value: Some(value.clone()),
                            state: FetchState::Ready,
                            error: None,
                            generation: current.generation,
                        });
                        info!(resource, "Patched");
                        let _ = respond_to.send(Ok(value));
                    }
                    Err(e) => {
                        warn!(resource, error = %e, "Patch failed");
                        let _ = respond_to.send(Err(FrameworkError::Patch(e)));
                    }
                }
            }
            ResourceRequest::Invalidate { respond_to } => {
                self.reset(resource);
                let _ = respond_to.send(Ok(()));
            }
            ResourceRequest::Completed { generation, result } => {
                self.complete(resource, generation, result);
            }
        }
    }

    fn on_trigger(&mut self, key: Option<SessionKey>, resource: &str, context: &R::Context) {
        if key == self.session {
            return;
        }
        let previous = std::mem::replace(&mut self.session, key);
        debug!(resource, ?previous, current = ?key, "Trigger changed");
        if previous.is_some() {
            self.reset(resource);
        }
        if key.is_some() {
            self.start_fetch(resource, context);
        }
    }

    /// Drops the value and orphans any in-flight fetch.
    fn reset(&mut self, resource: &str) {
        self.generation += 1;
        self.snapshot.send_replace(ResourceSnapshot::idle(self.generation));
        info!(resource, generation = self.generation, "Invalidated");
    }

    fn start_fetch(&mut self, resource: &str, context: &R::Context) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        self.snapshot.send_replace(ResourceSnapshot::loading(generation));
        debug!(resource, generation, "Fetch issued");

        let target = Arc::clone(&self.resource);
        let ctx = context.clone();
        let loopback = self.loopback.clone();
        tokio::spawn(async move {
            let result = target.fetch(&ctx).await;
            if let Some(sender) = loopback.upgrade() {
                let _ = sender.send(ResourceRequest::Completed { generation, result }).await;
            }
        });
        generation
    }

    fn complete(&mut self, resource: &str, generation: u64, result: Result<R::Value, ApiError>) {
        if generation != self.generation {
            debug!(resource, generation, latest = self.generation, "Discarding stale response");
            return;
        }
        let next = match result {
            Ok(value) => {
                info!(resource, generation, "Ready");
                ResourceSnapshot { value: Some(value), state: FetchState::Ready, error: None, generation }
            }
            Err(e) => {
                let message = self.resource.describe_error(&e);
                warn!(resource, generation, error = %e, "Fetch failed");
                ResourceSnapshot { value: None, state: FetchState::Error, error: Some(message), generation }
            }
        };
        self.snapshot.send_replace(next);
    }
}

// =============================================================================
// 4. THE HANDLE
// =============================================================================

/// A cloneable handle to a running [`ResourceActor`].
pub struct ResourceHandle<R: RemoteResource> {
    sender: mpsc::Sender<ResourceRequest<R>>,
    snapshot: watch::Receiver<ResourceSnapshot<R::Value>>,
}

impl<R: RemoteResource> Clone for ResourceHandle<R> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone(), snapshot: self.snapshot.clone() }
    }
}

impl<R: RemoteResource> ResourceHandle<R> {
    /// Current state without waiting.
    pub fn snapshot(&self) -> ResourceSnapshot<R::Value> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceSnapshot<R::Value>> {
        self.snapshot.clone()
    }

    /// Reissues the fetch and returns its generation.
    pub async fn refresh(&self) -> Result<u64, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(ResourceRequest::Refresh { respond_to })
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn patch(&self, patch: R::Patch) -> Result<R::Value, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(ResourceRequest::Patch { patch, respond_to })
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn invalidate(&self) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(ResourceRequest::Invalidate { respond_to })
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Waits until the resource is Ready or Error.
    pub async fn settled(&self) -> Result<ResourceSnapshot<R::Value>, FrameworkError> {
        let mut observer = self.snapshot.clone();
        let snapshot = observer.wait_for(|s| s.is_settled()).await
            .map_err(|_| FrameworkError::ActorClosed)?;
        Ok(snapshot.clone())
    }

    /// Waits until `generation` settles or is superseded.
    pub async fn wait_for_generation(&self, generation: u64) -> Result<ResourceSnapshot<R::Value>, FrameworkError> {
        let mut observer = self.snapshot.clone();
        let snapshot = observer
            .wait_for(|s| s.generation > generation || (s.generation == generation && s.is_settled()))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        Ok(snapshot.clone())
    }

    pub async fn refresh_and_wait(&self) -> Result<ResourceSnapshot<R::Value>, FrameworkError> {
        let generation = self.refresh().await?;
        self.wait_for_generation(generation).await
    }
}

// =============================================================================
// 5. TESTS
// =============================================================================
