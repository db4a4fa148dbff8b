use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Translator settings as read from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub enabled: bool,
    /// Base URL; requests go to `{endpoint}/headers` and `{endpoint}/values`.
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            timeout_secs: 10,
        }
    }
}

impl TranslatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Endpoint to call, when translation is switched on and configured.
    pub fn active_endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| self.enabled && !endpoint.is_empty())
    }
}
