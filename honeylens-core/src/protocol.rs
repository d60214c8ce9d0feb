//! Messages exchanged with the display surface
//!
//! Requests and outbound messages are tagged by an `action` field, matching
//! the relay format of the badge surface.

use serde::{Deserialize, Serialize};

use crate::DetectionResult;

/// Badge color for a positive verdict
pub const DANGER_COLOR: &str = "#FF0000";

/// Badge color for a negative verdict
pub const SAFE_COLOR: &str = "#00FF00";

/// Requests from the display surface to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Recompute and return the current result
    GetResults,
    /// The stored sensitivity changed (`None` when it was removed)
    ConfigChanged { sensitivity: Option<String> },
}

/// Engine replies. A result goes on the wire as the bare result object;
/// an acknowledgement is `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Results(DetectionResult),
    Ack,
}

/// Fire-and-forget messages from the engine to the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Outbound {
    UpdateBadge { data: BadgeUpdate },
}

/// Text and color shown on the page's badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeUpdate {
    pub text: String,
    pub color: String,
}

impl BadgeUpdate {
    /// Badge for a verdict: the score on red when positive, blank on green otherwise
    pub fn for_result(result: &DetectionResult) -> Self {
        if result.is_honeypot {
            Self {
                text: result.display_score(),
                color: DANGER_COLOR.to_string(),
            }
        } else {
            Self::cleared()
        }
    }

    /// Blank badge, shown while a document is (re)loading
    pub fn cleared() -> Self {
        Self {
            text: String::new(),
            color: SAFE_COLOR.to_string(),
        }
    }

    pub fn into_message(self) -> Outbound {
        Outbound::UpdateBadge { data: self }
    }
}
