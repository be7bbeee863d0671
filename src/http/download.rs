//! One-shot file download side channel for exported reports.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use async_trait::async_trait;
use bytes::Bytes;
use regex::Regex;
use tracing::info;

/// A binary payload plus the name it should be saved under.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Extracts the file name from a `Content-Disposition` header value.
pub fn parse_content_disposition(header: &str) -> Option<String> {
    static FILENAME: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = FILENAME
        .get_or_init(|| Regex::new(r#"filename\*?=(?:UTF-8'')?"?([^";]+)"?"#).ok())
        .as_ref()?;
    pattern
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|name| !name.is_empty())
}

/// File name from the header, or `fallback` when the header is missing or unusable.
pub fn resolve_file_name(header: Option<&str>, fallback: &str) -> String {
    header
        .and_then(parse_content_disposition)
        .and_then(|name| {
            Path::new(&name)
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| fallback.to_owned())
}

/// Where finished downloads go. Each call is a single attempt.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn save(&self, download: &Download) -> io::Result<PathBuf>;
}

/// Writes downloads into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn save(&self, download: &Download) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&download.file_name);
        tokio::fs::write(&path, &download.bytes).await?;
        info!(path = %path.display(), size = download.bytes.len(), "Download saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_and_bare_file_names() {
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="ICS_Report_Q1.xlsx""#).as_deref(),
            Some("ICS_Report_Q1.xlsx")
        );
        assert_eq!(
            parse_content_disposition("attachment; filename=report.xlsx; size=10").as_deref(),
            Some("report.xlsx")
        );
        assert_eq!(parse_content_disposition("inline"), None);
    }

    #[test]
    fn falls_back_and_strips_directories() {
        assert_eq!(resolve_file_name(None, "export.xlsx"), "export.xlsx");
        assert_eq!(
            resolve_file_name(Some(r#"attachment; filename="../../etc/passwd""#), "export.xlsx"),
            "passwd"
        );
    }

    #[tokio::test]
    async fn directory_sink_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("reports"));
        let download = Download {
            file_name: "admin_reports.xlsx".into(),
            bytes: Bytes::from_static(b"PK\x03\x04"),
        };

        let path = sink.save(&download).await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"PK\x03\x04");
    }
}
