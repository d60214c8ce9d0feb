//! The fixed signal taxonomy
//!
//! Seven lexical signals are derived from word/phrase lists matched against
//! the page's visible text; nine structural signals are derived from DOM
//! inspection. Every evaluation reports a raw value for each of them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A named heuristic measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalName {
    UrgencyScore,
    RewardScore,
    SuspiciousPhraseScore,
    EmotionTriggerScore,
    DeceptionScore,
    PressureTacticsScore,
    TrustSignalsScore,
    DomComplexityScore,
    HiddenContentScore,
    TimerPresenceScore,
    ExcessiveFormFieldsScore,
    LayoutManipulationScore,
    DarkPatternScore,
    SecurityIndicatorScore,
    ClickbaitScore,
    PrivacyInvasionScore,
}

impl SignalName {
    /// Every signal, in taxonomy order
    pub const ALL: [SignalName; 16] = [
        SignalName::UrgencyScore,
        SignalName::RewardScore,
        SignalName::SuspiciousPhraseScore,
        SignalName::EmotionTriggerScore,
        SignalName::DeceptionScore,
        SignalName::PressureTacticsScore,
        SignalName::TrustSignalsScore,
        SignalName::DomComplexityScore,
        SignalName::HiddenContentScore,
        SignalName::TimerPresenceScore,
        SignalName::ExcessiveFormFieldsScore,
        SignalName::LayoutManipulationScore,
        SignalName::DarkPatternScore,
        SignalName::SecurityIndicatorScore,
        SignalName::ClickbaitScore,
        SignalName::PrivacyInvasionScore,
    ];

    /// Wire name, as used in result breakdowns and weight tables
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalName::UrgencyScore => "urgencyScore",
            SignalName::RewardScore => "rewardScore",
            SignalName::SuspiciousPhraseScore => "suspiciousPhraseScore",
            SignalName::EmotionTriggerScore => "emotionTriggerScore",
            SignalName::DeceptionScore => "deceptionScore",
            SignalName::PressureTacticsScore => "pressureTacticsScore",
            SignalName::TrustSignalsScore => "trustSignalsScore",
            SignalName::DomComplexityScore => "domComplexityScore",
            SignalName::HiddenContentScore => "hiddenContentScore",
            SignalName::TimerPresenceScore => "timerPresenceScore",
            SignalName::ExcessiveFormFieldsScore => "excessiveFormFieldsScore",
            SignalName::LayoutManipulationScore => "layoutManipulationScore",
            SignalName::DarkPatternScore => "darkPatternScore",
            SignalName::SecurityIndicatorScore => "securityIndicatorScore",
            SignalName::ClickbaitScore => "clickbaitScore",
            SignalName::PrivacyInvasionScore => "privacyInvasionScore",
        }
    }

    /// Whether the signal comes from word/phrase lists rather than DOM structure
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            SignalName::UrgencyScore
                | SignalName::RewardScore
                | SignalName::SuspiciousPhraseScore
                | SignalName::EmotionTriggerScore
                | SignalName::DeceptionScore
                | SignalName::PressureTacticsScore
                | SignalName::TrustSignalsScore
        )
    }
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a name outside the taxonomy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown signal name: {0}")]
pub struct UnknownSignal(pub String);

impl FromStr for SignalName {
    type Err = UnknownSignal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownSignal(s.to_string()))
    }
}

/// Raw value per signal, ordered by taxonomy
pub type SignalBreakdown = BTreeMap<SignalName, u32>;

/// A breakdown with every signal present at zero
pub fn empty_breakdown() -> SignalBreakdown {
    SignalName::ALL.iter().map(|name| (*name, 0)).collect()
}
