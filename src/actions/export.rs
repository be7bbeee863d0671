//! Spreadsheet exports saved through a [`DownloadSink`].

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::http::{resolve_file_name, ApiClient, ApiRequest, Download, DownloadSink};

use super::dispatcher::Notifier;
use super::error::ActionError;

pub const ADMIN_EXPORT_PATH: &str = "/api/admin/reports/export";
pub const USER_EXPORT_PATH: &str = "/api/export";

pub const ADMIN_EXPORT_FILE: &str = "admin_reports.xlsx";
pub const USER_EXPORT_FILE: &str = "export.xlsx";

/// Downloads report files once, with no retry.
#[derive(Clone)]
pub struct ReportExporter {
    client: ApiClient,
    sink: Arc<dyn DownloadSink>,
    notifier: Notifier,
}

impl ReportExporter {
    pub fn new(client: ApiClient, sink: Arc<dyn DownloadSink>, notifier: Notifier) -> Self {
        Self { client, sink, notifier }
    }

    /// Cross-department report for admins.
    #[instrument(skip(self))]
    pub async fn export_admin_report(&self, from_dept: &str, to_dept: &str, time_period: &str) -> Result<PathBuf, ActionError> {
        let request = ApiRequest::get(ADMIN_EXPORT_PATH)
            .with_query("fromDept", from_dept)
            .with_query("toDept", to_dept)
            .with_query("timePeriod", time_period);
        self.download(request, ADMIN_EXPORT_FILE).await
    }

    /// The current user's submissions of the given kind.
    #[instrument(skip(self))]
    pub async fn export_user_report(&self, kind: &str, time_period: &str) -> Result<PathBuf, ActionError> {
        let request = ApiRequest::get(USER_EXPORT_PATH)
            .with_query("type", kind)
            .with_query("timePeriod", time_period);
        self.download(request, USER_EXPORT_FILE).await
    }

    async fn download(&self, request: ApiRequest, fallback: &str) -> Result<PathBuf, ActionError> {
        let result = self.fetch_and_save(request, fallback).await;
        match &result {
            Ok(path) => self.notifier.success("Download Complete", format!("Saved {}", path.display())),
            Err(e) => self.notifier.failure("Download Failed", e.to_string()),
        }
        result
    }

    async fn fetch_and_save(&self, request: ApiRequest, fallback: &str) -> Result<PathBuf, ActionError> {
        let response = self.client.get_bytes(request).await?;
        let download = Download {
            file_name: resolve_file_name(response.content_disposition.as_deref(), fallback),
            bytes: response.body,
        };
        let path = self.sink.save(&download).await?;
        info!(file = %download.file_name, bytes = download.bytes.len(), "Report saved");
        Ok(path)
    }
}
