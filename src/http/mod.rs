//! HTTP plumbing shared by every Resource: transport, client, session, downloads.

pub mod auth;
pub mod client;
pub mod download;
pub mod error;
pub mod session;

pub use auth::AuthApi;
pub use client::{ApiClient, ApiRequest, RawResponse, ReqwestTransport, Transport};
pub use download::{parse_content_disposition, resolve_file_name, DirectorySink, Download, DownloadSink};
pub use error::ApiError;
pub use session::{AuthState, SessionEvent, SessionGuard, SessionKey};
