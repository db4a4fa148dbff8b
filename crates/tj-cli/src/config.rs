//! Importer configuration file.
//!
//! Read from `--config PATH` or, when absent, the platform config folder:
//! - macOS: ~/Library/Application Support/com.trade-journal.Trade-Import/
//! - Windows: %APPDATA%/trade-journal/Trade Import/config/
//! - Linux: ~/.config/trade-import/

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tj_map::MatchOptions;
use tj_model::{ImportContext, ImportDefaults, TradingMode};
use tj_translate::TranslatorConfig;
use tracing::{info, warn};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "trade-journal";
const APP_NAME: &str = "Trade Import";
const CONFIG_FILENAME: &str = "config.toml";

/// Store file used when neither the config nor the command line names one.
pub const DEFAULT_STORE_FILE: &str = "trades.jsonl";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub defaults: ImportDefaults,
    pub matching: MatchOptions,
    pub translator: TranslatorConfig,
    pub context: ContextConfig,
    pub store: StoreConfig,
}

/// Target account, as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub mode: TradingMode,
    pub account_id: Option<String>,
    pub strategy_id: Option<String>,
}

impl ContextConfig {
    /// Replaces each setting that the command line gives.
    pub fn with_overrides(
        &self,
        mode: Option<TradingMode>,
        account_id: Option<&str>,
        strategy_id: Option<&str>,
    ) -> Self {
        Self {
            mode: mode.unwrap_or(self.mode),
            account_id: account_id
                .map(str::to_string)
                .or_else(|| self.account_id.clone()),
            strategy_id: strategy_id
                .map(str::to_string)
                .or_else(|| self.strategy_id.clone()),
        }
    }

    /// The import target, once an account is known.
    pub fn to_context(&self) -> Option<ImportContext> {
        let account_id = self.account_id.as_deref()?;
        let context = ImportContext::new(self.mode, account_id);
        Some(match &self.strategy_id {
            Some(strategy) => context.with_strategy(strategy.as_str()),
            None => context,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON-lines file trades are appended to.
    pub path: Option<PathBuf>,
}

impl ImportConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration")
    }

    pub fn store_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE))
    }
}

/// Platform config file location, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Loads the configuration.
///
/// An explicit path must exist and parse. The platform file is optional:
/// when it is missing or unreadable the defaults are used.
pub fn load_config(explicit: Option<&Path>) -> Result<ImportConfig> {
    if let Some(path) = explicit {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = ImportConfig::from_toml_str(&text)
            .with_context(|| format!("in config {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        return Ok(config);
    }

    let Some(path) = default_config_path() else {
        warn!("could not determine config path, using defaults");
        return Ok(ImportConfig::default());
    };
    match fs::read_to_string(&path) {
        Ok(text) => match ImportConfig::from_toml_str(&text) {
            Ok(config) => {
                info!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable config");
                Ok(ImportConfig::default())
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(ImportConfig::default()),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable config");
            Ok(ImportConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(
            ImportConfig::from_toml_str("").unwrap(),
            ImportConfig::default()
        );
    }

    #[test]
    fn test_sections_parse() {
        let config = ImportConfig::from_toml_str(
            r#"
            [defaults]
            risk_reward_ratio = 1.5

            [matching]
            header_threshold = 70

            [translator]
            enabled = true
            endpoint = "http://localhost:8080"

            [context]
            mode = "backtesting"
            account_id = "acc-1"

            [store]
            path = "journal.jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(config.defaults.risk_reward_ratio, Some(1.5));
        assert_eq!(config.defaults.risk_per_trade, None);
        assert_eq!(config.matching.header_threshold, 70);
        assert_eq!(config.matching.sample_size, 5);
        assert_eq!(config.translator.active_endpoint(), Some("http://localhost:8080"));
        assert_eq!(config.translator.timeout_secs, 10);
        assert_eq!(
            config.context.to_context(),
            Some(ImportContext::new(TradingMode::Backtesting, "acc-1"))
        );
        assert_eq!(config.store_path(), PathBuf::from("journal.jsonl"));
    }

    #[test]
    fn test_command_line_overrides_context() {
        let configured = ContextConfig {
            mode: TradingMode::Demo,
            account_id: Some("acc-1".to_string()),
            strategy_id: Some("breakout".to_string()),
        };
        let context = configured
            .with_overrides(Some(TradingMode::Live), Some("acc-2"), None)
            .to_context();
        assert_eq!(
            context,
            Some(ImportContext::new(TradingMode::Live, "acc-2").with_strategy("breakout"))
        );
        assert_eq!(configured.with_overrides(None, None, None), configured);
        assert_eq!(ContextConfig::default().to_context(), None);
    }

    #[test]
    fn test_round_trip() {
        let config = ImportConfig {
            defaults: ImportDefaults::default().with_risk_per_trade(1.0),
            ..ImportConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(ImportConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.toml");
        fs::write(&path, "[context]\naccount_id = \"main\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.context.account_id.as_deref(), Some("main"));

        let missing = dir.path().join("missing.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_invalid_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[matching]\nheader_threshold = \"high\"\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
