//! Generic engine for remote, read-mostly resources.
//!
//! Each resource runs as its own actor that owns a fetch state machine
//! (idle, loading, ready, error) and publishes snapshots over a watch channel.
//!
//! # Main Components
//!
//! - [`RemoteResource`] - Trait describing how a resource fetches and patches
//! - [`ResourceActor`] - Actor owning one resource's state and generation counter
//! - [`ResourceHandle`] - Cloneable handle for refresh, patch and observation
//! - [`FetchTrigger`] - Precondition that gates the first fetch
//!
//! # Testing
//!
//! See [`mock`] for a scripted transport that stands in for the backend.

pub mod core;
pub mod mock;
pub mod trigger;

pub use core::*;
pub use trigger::FetchTrigger;
