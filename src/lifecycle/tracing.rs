//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered
//! by `RUST_LOG`. Module paths are hidden (`with_target(false)`); every
//! resource log line carries a `resource` field instead.
//!
//! ## What Gets Traced
//!
//! - **Resource Lifecycle**: started, fetch issued, ready, invalidated, shutdown
//! - **Ordering**: stale responses discarded by generation, with both generation numbers
//! - **HTTP**: one span per request (`method`, `path`), failures with `status`
//! - **Actions**: one span per dispatcher operation, failures as `warn`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle only
//! RUST_LOG=info cargo run
//!
//! # Requests, fetch generations and payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the resource engine
//! RUST_LOG=survey_resources::framework=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! A refresh racing an earlier fetch, with `RUST_LOG=debug`:
//!
//! ```text
//! DEBUG Fetch issued resource="department-ratings" generation=1
//! DEBUG Fetch issued resource="department-ratings" generation=2
//! INFO  Ready resource="department-ratings" generation=2
//! DEBUG Discarding stale response resource="department-ratings" generation=1 latest=2
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
