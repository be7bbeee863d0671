//! # Dependent Fetches
//!
//! Resources whose value depends on more than one call. Both combinators are
//! themselves [`RemoteResource`]s, so the actor's generation discard and
//! trigger handling apply to the combined fetch as a whole.
//!
//! - [`SequentialMerge`]: two fetches that must both succeed before their
//!   values are combined.
//! - [`GateThenFetch`]: a best-effort preparatory call that always lets the
//!   dependent fetch run afterwards.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::framework::RemoteResource;
use crate::http::{ApiClient, ApiError, ApiRequest};

// =============================================================================
// 1. SEQUENTIAL MERGE
// =============================================================================

/// Which side keeps an overlapping key in [`merge_objects`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePrecedence {
    LeftWins,
    RightWins,
}

/// Shallow merge of two JSON objects.
///
/// Keys present on only one side are always kept. Non-object inputs are a
/// [`ApiError::Parse`].
pub fn merge_objects(left: Value, right: Value, precedence: MergePrecedence) -> Result<Value, ApiError> {
    let (Value::Object(left), Value::Object(right)) = (left, right) else {
        return Err(ApiError::Parse("expected two JSON objects to merge".into()));
    };
    let (mut base, overlay): (Map<String, Value>, Map<String, Value>) = match precedence {
        MergePrecedence::RightWins => (left, right),
        MergePrecedence::LeftWins => (right, left),
    };
    for (key, value) in overlay {
        base.insert(key, value);
    }
    Ok(Value::Object(base))
}

type MergeFn<A, B, V> = dyn Fn(A, B) -> Result<V, ApiError> + Send + Sync;

/// Two resources fetched together and combined only on double success.
///
/// If either side fails the combined fetch fails with that error; the merge
/// function never sees a partial result.
pub struct SequentialMerge<L: RemoteResource, R: RemoteResource, V> {
    name: String,
    left: L,
    right: R,
    merge: Box<MergeFn<L::Value, R::Value, V>>,
    failure: Option<String>,
}

impl<L, R, V> SequentialMerge<L, R, V>
where
    L: RemoteResource,
    R: RemoteResource<Context = L::Context>,
{
    pub fn new(
        name: impl Into<String>,
        left: L,
        right: R,
        merge: impl Fn(L::Value, R::Value) -> Result<V, ApiError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            left,
            right,
            merge: Box::new(merge),
            failure: None,
        }
    }

    /// Replaces every failure with a fixed message.
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

#[async_trait]
impl<L, R, V> RemoteResource for SequentialMerge<L, R, V>
where
    L: RemoteResource,
    R: RemoteResource<Context = L::Context>,
    V: Clone + std::fmt::Debug + Send + Sync + 'static,
{
    type Value = V;
    type Patch = ();
    type Context = L::Context;

    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, ctx: &Self::Context) -> Result<V, ApiError> {
        let (left, right) = tokio::try_join!(self.left.fetch(ctx), self.right.fetch(ctx))?;
        debug!(resource = %self.name, "Both sides ready, merging");
        (self.merge)(left, right)
    }

    fn describe_error(&self, error: &ApiError) -> String {
        match &self.failure {
            Some(message) => message.clone(),
            None => error.to_string(),
        }
    }
}

// =============================================================================
// 2. GATE THEN FETCH
// =============================================================================

/// Shared count of gate calls that failed.
#[derive(Debug, Clone, Default)]
pub struct GateFailures(Arc<AtomicU64>);

impl GateFailures {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Issues `gate` before every fetch of `inner`.
///
/// The gate is best-effort: its failure is logged and counted, and the inner
/// fetch is issued regardless.
pub struct GateThenFetch<R> {
    gate: ApiRequest,
    inner: R,
    failures: GateFailures,
}

impl<R: RemoteResource<Context = ApiClient>> GateThenFetch<R> {
    pub fn new(gate: ApiRequest, inner: R) -> Self {
        Self { gate, inner, failures: GateFailures::default() }
    }

    /// Handle on the failure counter; stays valid after the resource moves
    /// into its actor.
    pub fn failures(&self) -> GateFailures {
        self.failures.clone()
    }
}

#[async_trait]
impl<R: RemoteResource<Context = ApiClient>> RemoteResource for GateThenFetch<R> {
    type Value = R::Value;
    type Patch = R::Patch;
    type Context = ApiClient;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self, ctx: &ApiClient) -> Result<R::Value, ApiError> {
        if let Err(e) = ctx.send(self.gate.clone()).await {
            self.failures.record();
            warn!(
                resource = self.inner.name(),
                gate = %self.gate.path,
                error = %e,
                failures = self.failures.count(),
                "Gate call failed, fetching anyway"
            );
        }
        self.inner.fetch(ctx).await
    }

    fn apply_patch(&self, value: &mut R::Value, patch: R::Patch) -> Result<(), String> {
        self.inner.apply_patch(value, patch)
    }

    fn describe_error(&self, error: &ApiError) -> String {
        self.inner.describe_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_right_wins_overwrites_overlapping_keys() {
        let left = json!({"total": 10, "attendance_departments": null});
        let right = json!({"attendance_departments": {"missed_count": 2}});
        let merged = merge_objects(left, right, MergePrecedence::RightWins).unwrap();
        assert_eq!(merged, json!({"total": 10, "attendance_departments": {"missed_count": 2}}));
    }

    #[test]
    fn test_left_wins_keeps_existing_keys() {
        let merged = merge_objects(json!({"a": 1}), json!({"a": 2, "b": 3}), MergePrecedence::LeftWins).unwrap();
        assert_eq!(merged, json!({"a": 1, "b": 3}));
    }

    #[test]
    fn test_non_objects_are_rejected() {
        let result = merge_objects(json!([1]), json!({}), MergePrecedence::RightWins);
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}
