//! Versioned weight tables
//!
//! Weights are data, not code: a table carries a version label and can be
//! swapped (or loaded from TOML) without touching extractor logic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::{SignalName, SIGNAL_CEILING};

/// Version label of the built-in table
pub const DEFAULT_WEIGHTS_VERSION: &str = "v1";

/// Errors from building a weight table
#[derive(Debug, Error)]
pub enum WeightsError {
    #[error("unknown signal in weight table: {0}")]
    UnknownSignal(String),

    #[error("weight for {name} must be positive and finite, got {value}")]
    InvalidWeight { name: String, value: f64 },

    #[error("failed to parse weight table: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Signal weights keyed by taxonomy name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTable {
    pub version: String,
    pub weights: BTreeMap<SignalName, f64>,
}

/// TOML/serde form of a weight table, keyed by wire name
#[derive(Debug, Clone, Deserialize)]
pub struct WeightTableConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub table: BTreeMap<String, f64>,
}

fn default_version() -> String {
    "custom".to_string()
}

impl Default for WeightTable {
    fn default() -> Self {
        let weights = [
            (SignalName::UrgencyScore, 2.5),
            (SignalName::RewardScore, 2.0),
            (SignalName::SuspiciousPhraseScore, 3.0),
            (SignalName::EmotionTriggerScore, 2.5),
            (SignalName::DeceptionScore, 3.5),
            (SignalName::PressureTacticsScore, 3.0),
            (SignalName::TrustSignalsScore, 2.0),
            (SignalName::DomComplexityScore, 1.5),
            (SignalName::HiddenContentScore, 3.5),
            (SignalName::TimerPresenceScore, 3.0),
            (SignalName::ExcessiveFormFieldsScore, 2.0),
            (SignalName::LayoutManipulationScore, 2.5),
            (SignalName::DarkPatternScore, 3.5),
            (SignalName::SecurityIndicatorScore, 2.5),
            (SignalName::ClickbaitScore, 2.0),
            (SignalName::PrivacyInvasionScore, 3.0),
        ]
        .into_iter()
        .collect();

        Self {
            version: DEFAULT_WEIGHTS_VERSION.to_string(),
            weights,
        }
    }
}

impl WeightTable {
    /// Weight of a signal; signals missing from the table weigh 1
    pub fn weight(&self, name: SignalName) -> f64 {
        self.weights.get(&name).copied().unwrap_or(1.0)
    }

    /// Sum of every weight in the table
    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Normalization denominator: every tabled signal at the uniform ceiling
    pub fn max_possible(&self) -> f64 {
        self.total_weight() * SIGNAL_CEILING
    }

    /// Parse a standalone TOML document (`version = ..`, `[table]`)
    pub fn from_toml_str(s: &str) -> Result<Self, WeightsError> {
        let config: WeightTableConfig = toml::from_str(s)?;
        Self::try_from(config)
    }
}

impl TryFrom<WeightTableConfig> for WeightTable {
    type Error = WeightsError;

    fn try_from(config: WeightTableConfig) -> Result<Self, Self::Error> {
        let mut weights = BTreeMap::new();

        for (key, value) in config.table {
            let name: SignalName = key
                .parse()
                .map_err(|_| WeightsError::UnknownSignal(key.clone()))?;

            if !value.is_finite() || value <= 0.0 {
                return Err(WeightsError::InvalidWeight { name: key, value });
            }

            weights.insert(name, value);
        }

        Ok(Self {
            version: config.version,
            weights,
        })
    }
}
