//! # Register Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     TORQUE_API_URL=https://api.torque.example/v1                        │
//! │     TORQUE_API_TOKEN=...                                                │
//! │     TORQUE_STORE_NAME="Westlands Branch"                                │
//! │     TORQUE_CURRENCY_SYMBOL="KSh "                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/torque-pos/register.toml (Linux)                          │
//! │     ~/Library/Application Support/com.torque.pos/register.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # register.toml
//! [backend]
//! base_url = "https://api.torque.example/v1"
//! sales_path = "sales"
//! payments_path = "payments"
//! api_token = "..."
//! request_timeout_secs = 30
//!
//! [store]
//! name = "Westlands Branch"
//! currency_symbol = "KSh "
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use torque_core::Money;
use torque_remote::BackendConfig;
use tracing::{debug, info};

/// Store-level display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Printed on receipts and the sales list header.
    pub name: String,

    /// Prefix for amounts, including any spacing.
    pub currency_symbol: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: "Torque Auto Parts".to_string(),
            currency_symbol: "KSh ".to_string(),
        }
    }
}

/// Complete register configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    pub backend: BackendConfig,
    pub store: StoreConfig,
}

impl RegisterConfig {
    /// Loads configuration from file (if present), then environment.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading register config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.backend
            .validate()
            .context("invalid [backend] section")?;
        Ok(())
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("TORQUE_API_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.base_url = url;
        }

        if let Some(token) = lookup("TORQUE_API_TOKEN") {
            self.backend.api_token = Some(token);
        }

        if let Some(name) = lookup("TORQUE_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(symbol) = lookup("TORQUE_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "torque", "pos")
            .map(|dirs| dirs.config_dir().join("register.toml"))
    }

    /// Formats an amount for display with the store's currency symbol.
    ///
    /// ## Example
    /// - `100_050` cents with symbol `"KSh "` → `"KSh 1000.50"`
    /// - `-550` cents → `"-KSh 5.50"`
    pub fn format_money(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!("{sign}{}{}", self.store.currency_symbol, amount.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_full_file() {
        let config = RegisterConfig::from_toml_str(
            r#"
            [backend]
            base_url = "https://api.torque.example/v1"
            payments_path = "sale-payments"
            request_timeout_secs = 30

            [store]
            name = "Westlands Branch"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "https://api.torque.example/v1");
        assert_eq!(config.backend.sales_path, "sales");
        assert_eq!(config.backend.payments_path, "sale-payments");
        assert_eq!(config.backend.request_timeout_secs, Some(30));
        assert_eq!(config.store.name, "Westlands Branch");
        assert_eq!(config.store.currency_symbol, "KSh ");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_is_defaults() {
        let config = RegisterConfig::from_toml_str("").unwrap();
        assert_eq!(config, RegisterConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TORQUE_API_URL", "https://override.example"),
            ("TORQUE_API_TOKEN", "t0ken"),
            ("TORQUE_CURRENCY_SYMBOL", "$"),
        ]
        .into_iter()
        .collect();

        let mut config = RegisterConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend.base_url, "https://override.example");
        assert_eq!(config.backend.token(), Some("t0ken"));
        assert_eq!(config.store.currency_symbol, "$");
        assert_eq!(config.store.name, StoreConfig::default().name);
    }

    #[test]
    fn test_invalid_backend_url() {
        let config = RegisterConfig::from_toml_str(
            r#"
            [backend]
            base_url = "ws://hub.local:8080"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_format_money() {
        let config = RegisterConfig::default();
        assert_eq!(config.format_money(Money::from_cents(100_050)), "KSh 1000.50");
        assert_eq!(config.format_money(Money::from_cents(-550)), "-KSh 5.50");
        assert_eq!(config.format_money(Money::zero()), "KSh 0.00");
        assert_eq!(config.format_money(Money::from_cents(-5)), "-KSh 0.05");
    }
}
