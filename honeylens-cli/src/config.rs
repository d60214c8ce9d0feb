use anyhow::{Context, Result};
use honeylens_core::{WeightTable, WeightTableConfig, DEFAULT_COOLDOWN_MS};
use honeylens_dom::FetchConfig;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Contents of `honeylens.toml`. The top-level `sensitivity` key is read
/// separately through the runtime's sensitivity store.
#[derive(Debug, Default, Deserialize)]
pub struct HoneylensConfig {
    #[serde(default)]
    pub throttle: ThrottleConfig,
    pub weights: Option<WeightTableConfig>,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotifyConfig {
    pub webhook_url: Option<String>,
}

fn default_cooldown_ms() -> u64 {
    DEFAULT_COOLDOWN_MS
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl HoneylensConfig {
    /// Load the configuration file; a missing file means all defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The configured weight table. A `[weights]` section without entries
    /// keeps the built-in weights.
    pub fn weight_table(&self) -> Result<WeightTable> {
        match &self.weights {
            Some(table) if !table.table.is_empty() => Ok(WeightTable::try_from(table.clone())?),
            _ => Ok(WeightTable::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use honeylens_core::SignalName;

    #[test]
    fn test_defaults() {
        let config = HoneylensConfig::parse("").unwrap();
        assert_eq!(config.throttle.cooldown_ms, 5000);
        assert!(config.notify.webhook_url.is_none());
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.weight_table().unwrap(), WeightTable::default());
    }

    #[test]
    fn test_full_file() {
        let config = HoneylensConfig::parse(
            r#"
            sensitivity = "40"

            [throttle]
            cooldown_ms = 250

            [weights]
            version = "strict-urgency"

            [weights.table]
            urgencyScore = 5.0
            rewardScore = 1.0

            [notify]
            webhook_url = "http://127.0.0.1:8080/badge"

            [fetch]
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.throttle.cooldown_ms, 250);
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(
            config.notify.webhook_url.as_deref(),
            Some("http://127.0.0.1:8080/badge")
        );

        let table = config.weight_table().unwrap();
        assert_eq!(table.version, "strict-urgency");
        assert_eq!(table.weight(SignalName::UrgencyScore), 5.0);
        assert_eq!(table.max_possible(), 24.0);
    }

    #[test]
    fn test_version_only_keeps_builtin_weights() {
        let config = HoneylensConfig::parse("[weights]\nversion = \"v2\"\n").unwrap();
        assert_eq!(config.weight_table().unwrap().total_weight(), 42.0);
    }

    #[test]
    fn test_rejects_unknown_signal() {
        let config = HoneylensConfig::parse("[weights.table]\ngreedScore = 2.0\n").unwrap();
        assert!(config.weight_table().is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = HoneylensConfig::from_file(Path::new("/nonexistent/honeylens.toml")).unwrap();
        assert_eq!(config.throttle.cooldown_ms, 5000);
    }
}
