//! Concrete resources of the survey portal and admin console.
//!
//! Most resources are a single JSON `GET` and are expressed as a
//! [`JsonEndpoint`]. Each submodule exposes factories that return the actor
//! and its handle, ready to be spawned by a system.

pub mod dashboard;
pub mod departments;
pub mod remarks;
pub mod reports;
pub mod surveys;

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::framework::{RemoteResource, ResourceActor, ResourceHandle};
use crate::http::{ApiClient, ApiError};

/// Mailbox size for every resource actor.
pub const RESOURCE_BUFFER: usize = 32;

/// How a fetch failure is worded in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureMessage {
    /// The error's own display text.
    Raw,
    /// Always this text.
    Fixed(String),
    /// The server's message when it sent one, otherwise this text.
    ServerOr(String),
}

impl FailureMessage {
    pub fn describe(&self, error: &ApiError) -> String {
        match self {
            FailureMessage::Raw => error.to_string(),
            FailureMessage::Fixed(message) => message.clone(),
            FailureMessage::ServerOr(fallback) => error
                .server_message()
                .map(str::to_owned)
                .unwrap_or_else(|| fallback.clone()),
        }
    }
}

/// A resource backed by one `GET` returning JSON.
pub struct JsonEndpoint<T> {
    name: &'static str,
    path: String,
    failure: FailureMessage,
    _value: PhantomData<fn() -> T>,
}

impl<T> JsonEndpoint<T> {
    pub fn new(name: &'static str, path: impl Into<String>) -> Self {
        Self {
            name,
            path: path.into(),
            failure: FailureMessage::Raw,
            _value: PhantomData,
        }
    }

    pub fn with_failure(mut self, failure: FailureMessage) -> Self {
        self.failure = failure;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl<T> RemoteResource for JsonEndpoint<T>
where
    T: DeserializeOwned + Clone + Debug + Send + Sync + 'static,
{
    type Value = T;
    type Patch = ();
    type Context = ApiClient;

    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(&self, ctx: &ApiClient) -> Result<T, ApiError> {
        ctx.get_json(&self.path).await
    }

    fn describe_error(&self, error: &ApiError) -> String {
        self.failure.describe(error)
    }
}

/// Actor and handle for `resource` with the default mailbox size.
pub fn spawnable<R: RemoteResource>(resource: R) -> (ResourceActor<R>, ResourceHandle<R>) {
    ResourceActor::new(resource, RESOURCE_BUFFER)
}
