//! Runtime orchestration and lifecycle management.
//!
//! - **Dependent fetches**: [`SequentialMerge`] and [`GateThenFetch`]
//! - **System wiring**: [`UserPortal`] and [`AdminConsole`] start every actor
//!   with its context and trigger, and join them on shutdown
//! - **Observability setup**: [`setup_tracing`]

pub mod actors;
pub mod console;
pub mod orchestrator;
pub mod portal;
pub mod tracing;

pub use actors::ActorSet;
pub use console::AdminConsole;
pub use orchestrator::{merge_objects, GateFailures, GateThenFetch, MergePrecedence, SequentialMerge};
pub use portal::UserPortal;
pub use tracing::setup_tracing;
