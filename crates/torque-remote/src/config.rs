//! # Backend Configuration
//!
//! Where the sales service lives and how to talk to it. Loaded as the
//! `[backend]` section of the register's config file.
//!
//! ```toml
//! [backend]
//! base_url = "https://api.torque.example/v1"
//! sales_path = "sales"
//! payments_path = "payments"
//! api_token = "..."            # optional
//! request_timeout_secs = 30    # optional, no timeout when absent
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RemoteError, RemoteResult};

/// Connection settings for the sales service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST API.
    pub base_url: String,

    /// Path of the sales collection, relative to `base_url`.
    pub sales_path: String,

    /// Path of the payments collection, relative to `base_url`.
    pub payments_path: String,

    /// Bearer token sent on every request.
    pub api_token: Option<String>,

    /// Per-request timeout. Unset means the client never gives up.
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: "http://localhost:8080/api".to_string(),
            sales_path: "sales".to_string(),
            payments_path: "payments".to_string(),
            api_token: None,
            request_timeout_secs: None,
        }
    }
}

impl BackendConfig {
    /// Checks the settings and returns the parsed base URL.
    pub fn validate(&self) -> RemoteResult<Url> {
        let url = Url::parse(self.base_url.trim())?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(RemoteError::InvalidConfig(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }

        for (name, path) in [("sales_path", &self.sales_path), ("payments_path", &self.payments_path)] {
            if segment(path).is_empty() {
                return Err(RemoteError::InvalidConfig(format!("{name} must not be empty")));
            }
        }

        if self.request_timeout_secs == Some(0) {
            return Err(RemoteError::InvalidConfig(
                "request_timeout_secs must be positive".to_string(),
            ));
        }

        Ok(url)
    }

    /// Timeout as a duration, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Bearer token, ignoring blank values.
    pub fn token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Joins a base URL and a relative path with exactly one `/` between them.
pub(crate) fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        segment(path)
    )
}

/// A configured path with surrounding slashes and whitespace removed.
fn segment(path: &str) -> &str {
    path.trim_matches(|c: char| c == '/' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BackendConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_rejects_bad_urls() {
        let config = BackendConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RemoteError::InvalidConfig(_))));

        let config = BackendConfig {
            base_url: "ftp://files.example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RemoteError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_empty_paths_and_zero_timeout() {
        for path in [" / ", "", "//", "/ /"] {
            let config = BackendConfig {
                payments_path: path.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(RemoteError::InvalidConfig(_))),
                "{path:?} should be rejected"
            );
        }

        let config = BackendConfig {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config: BackendConfig = serde_json::from_str(
            r#"{"base_url": "https://pos.example.com", "request_timeout_secs": 15}"#,
        )
        .unwrap();
        assert_eq!(config.sales_path, "sales");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = BackendConfig {
            api_token: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.token(), None);
    }

    #[test]
    fn test_join() {
        assert_eq!(join("http://h/api/", "/sales"), "http://h/api/sales");
        assert_eq!(join("http://h/api", "payments/"), "http://h/api/payments");
        assert_eq!(join("http://h/api", " /sales/ "), "http://h/api/sales");
    }
}
