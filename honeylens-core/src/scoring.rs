//! Weighted aggregation and threshold classification
//!
//! `normalized = Σ(value × weight) / (Σ weights × 4) × 100`. The denominator
//! assumes every signal can reach 4 even though most extractors cap at 3,
//! so a page maxing out every extractor still scores below 100.

use serde::{Deserialize, Serialize};

use crate::{SignalBreakdown, WeightTable};

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    /// Weighted total rescaled against the theoretical maximum (not clamped)
    pub normalized_score: f64,
    /// `normalized_score > sensitivity`
    pub is_honeypot: bool,
    /// Raw value per signal
    pub details: SignalBreakdown,
}

impl DetectionResult {
    /// Score rendered with two decimals
    pub fn display_score(&self) -> String {
        format!("{:.2}", self.normalized_score)
    }
}

/// Σ value × weight over the breakdown
pub fn weighted_total(breakdown: &SignalBreakdown, weights: &WeightTable) -> f64 {
    breakdown
        .iter()
        .map(|(name, value)| *value as f64 * weights.weight(*name))
        .sum()
}

/// Rescale a weighted total to the 0-100 range of the table
pub fn normalize(total: f64, weights: &WeightTable) -> f64 {
    let max_possible = weights.max_possible();
    if max_possible <= 0.0 {
        return 0.0;
    }
    total / max_possible * 100.0
}

/// Strict threshold test: a score equal to the sensitivity is negative
pub fn is_honeypot(normalized_score: f64, sensitivity: f64) -> bool {
    normalized_score > sensitivity
}

/// Aggregate a breakdown and classify it against the sensitivity
pub fn classify(
    breakdown: SignalBreakdown,
    weights: &WeightTable,
    sensitivity: f64,
) -> DetectionResult {
    let normalized_score = normalize(weighted_total(&breakdown, weights), weights);

    DetectionResult {
        normalized_score,
        is_honeypot: is_honeypot(normalized_score, sensitivity),
        details: breakdown,
    }
}
