//! Runtime configuration and the named constants every view and validator shares.

use std::path::PathBuf;

use url::Url;

use crate::http::ApiError;

/// Scores strictly below this are flagged "needs attention".
pub const ATTENTION_THRESHOLD: f64 = 80.0;

/// Star ratings at or below this require a written remark.
pub const LOW_RATING_MAX: u8 = 2;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Department filter sentinel meaning "no filter".
pub const ALL_DEPARTMENTS: &str = "All";

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalConfig {
    pub base_url: Url,
    /// Applies to every request; Resources never manage timeouts themselves.
    pub timeout_ms: u64,
    pub user_agent: String,
    pub download_dir: PathBuf,
}

impl PortalConfig {
    /// Configuration for the backend at `base_url`, other settings at their
    /// defaults.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            timeout_ms: 30_000,
            user_agent: format!("survey-resources/{}", env!("CARGO_PKG_VERSION")),
            download_dir: PathBuf::from("downloads"),
        })
    }

    /// The local development backend.
    pub fn local() -> Result<Self, ApiError> {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Reads `SURVEY_API_BASE_URL`, `SURVEY_API_TIMEOUT_MS` and
    /// `SURVEY_DOWNLOAD_DIR`, after loading a `.env` file if one exists.
    pub fn from_env() -> Result<Self, ApiError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_url = lookup("SURVEY_API_BASE_URL");
        let mut config = Self::new(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        if let Some(timeout) = lookup("SURVEY_API_TIMEOUT_MS") {
            config.timeout_ms = timeout.parse().map_err(|_| {
                ApiError::Configuration(format!("SURVEY_API_TIMEOUT_MS is not a number: {timeout}"))
            })?;
        }
        if let Some(dir) = lookup("SURVEY_DOWNLOAD_DIR") {
            config.download_dir = PathBuf::from(dir);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let config = PortalConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:5000/");
        assert_eq!(config.timeout_ms, 30_000);
    }

    #[test]
    fn overrides_are_validated() {
        let config = PortalConfig::from_lookup(lookup(&[
            ("SURVEY_API_BASE_URL", "https://ics.example.com"),
            ("SURVEY_API_TIMEOUT_MS", "5000"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.host_str(), Some("ics.example.com"));
        assert_eq!(config.timeout_ms, 5000);

        let err = PortalConfig::from_lookup(lookup(&[("SURVEY_API_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn malformed_base_url_is_a_configuration_error() {
        let err = PortalConfig::new("not a url").unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
        assert_eq!(PortalConfig::local().unwrap().base_url.as_str(), "http://localhost:5000/");
    }
}
