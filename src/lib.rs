//! # Survey Resources
//!
//! > **The data layer of a department satisfaction survey portal.**
//!
//! Server data (departments, dashboards, remarks, surveys) is modelled as
//! *remote resources*: each one is an actor that owns a small fetch state
//! machine and publishes snapshots that readers observe without locking.
//!
//! ## Core Concepts
//!
//! ### Resources as Actors
//! A [`ResourceActor`](framework::ResourceActor) is the single writer of its
//! resource's state (`idle`, `loading`, `ready`, `error`). Handles send it
//! `Refresh`, `Patch` and `Invalidate` requests; readers take
//! [`ResourceSnapshot`](framework::ResourceSnapshot)s from a watch channel.
//!
//! ### Generations, not Cancellation
//! Every fetch is tagged with a generation number. A response is applied only
//! if it belongs to the latest fetch, so a slow early response can never
//! overwrite a newer one. Sign-out and user switches bump the generation too.
//!
//! ### Triggers
//! A [`FetchTrigger`](framework::FetchTrigger) keeps a resource idle until the
//! session is authenticated, and resets it when the session ends or changes
//! hands.
//!
//! ### One Place for 401
//! [`ApiClient`](http::ApiClient) expires the session on any 401 and emits a
//! login-required event; nothing else handles it.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Generic resource actor, handle, trigger, and a scripted mock transport.
//!
//! ### 2. The Wire ([`http`])
//! Transport seam, API client, session guard, auth calls, file downloads.
//!
//! ### 3. The Resources ([`resources`], [`model`])
//! One factory per backend resource, plus the DTOs they decode.
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! Merged and gated fetches, and the [`UserPortal`](lifecycle::UserPortal) /
//! [`AdminConsole`](lifecycle::AdminConsole) systems that wire everything.
//!
//! ### 5. Views and Actions ([`views`], [`actions`])
//! Pure derived view models, and the dispatcher for user mutations.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run against a local backend with info logs
//! SURVEY_API_BASE_URL=http://localhost:5000 RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod actions;
pub mod config;
pub mod framework;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod resources;
pub mod views;
