//! Human and JSON renderings of a detection result

use chrono::{DateTime, Utc};
use honeylens_core::{BadgeUpdate, DetectionResult, WeightTable};
use serde::Serialize;

/// JSON report written by `scan --json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport<'a> {
    pub url: &'a str,
    pub fingerprint: String,
    pub scanned_at: DateTime<Utc>,
    pub sensitivity: f64,
    pub weights_version: &'a str,
    #[serde(flatten)]
    pub result: &'a DetectionResult,
}

/// Verdict line followed by every signal value
pub fn render_result(result: &DetectionResult) -> String {
    let mut out = if result.is_honeypot {
        format!(
            "Warning: Potential Cognitive Honeypot Detected (Score: {})\n",
            result.display_score()
        )
    } else {
        format!(
            "No Cognitive Honeypot Detected (Score: {})\n",
            result.display_score()
        )
    };

    out.push_str("\nDetection Details:\n");
    for (signal, value) in &result.details {
        out.push_str(&format!("  {:<26} {:>5.2}\n", format!("{}:", signal), *value as f64));
    }
    out
}

pub fn render_badge(update: &BadgeUpdate) -> String {
    if update.text.is_empty() {
        format!("[badge] cleared ({})", update.color)
    } else {
        format!("[badge] {} ({})", update.text, update.color)
    }
}

pub fn render_weights(table: &WeightTable) -> String {
    let mut out = format!("Weight table {}\n", table.version);
    for (signal, weight) in &table.weights {
        out.push_str(&format!("  {:<26} {:>6.2}\n", signal.as_str(), weight));
    }
    out.push_str(&format!("  {:<26} {:>6.2}\n", "total", table.total_weight()));
    out.push_str(&format!("  {:<26} {:>6.2}\n", "normalization", table.max_possible()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use honeylens_core::{classify, empty_breakdown, SignalName};

    fn urgency_result(sensitivity: f64) -> DetectionResult {
        let mut breakdown = empty_breakdown();
        breakdown.insert(SignalName::UrgencyScore, 2);
        classify(breakdown, &WeightTable::default(), sensitivity)
    }

    #[test]
    fn test_negative_verdict() {
        let text = render_result(&urgency_result(65.0));
        assert!(text.starts_with("No Cognitive Honeypot Detected (Score: 2.98)"));
        assert!(text.contains("urgencyScore:"));
        assert!(text.contains(" 2.00"));
        assert_eq!(text.lines().filter(|l| l.starts_with("  ")).count(), 16);
    }

    #[test]
    fn test_positive_verdict() {
        let text = render_result(&urgency_result(1.0));
        assert!(text.starts_with("Warning: Potential Cognitive Honeypot Detected (Score: 2.98)"));
    }

    #[test]
    fn test_json_report_fields() {
        let result = urgency_result(65.0);
        let report = ScanReport {
            url: "https://shop.example/",
            fingerprint: "0123456789abcdef".to_string(),
            scanned_at: Utc::now(),
            sensitivity: 65.0,
            weights_version: "v1",
            result: &result,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["isHoneypot"], false);
        assert_eq!(json["details"]["urgencyScore"], 2);
        assert_eq!(json["weightsVersion"], "v1");
        assert!(json.get("scannedAt").is_some());
    }

    #[test]
    fn test_badge_rendering() {
        assert_eq!(render_badge(&BadgeUpdate::cleared()), "[badge] cleared (#00FF00)");
        let danger = BadgeUpdate::for_result(&urgency_result(1.0));
        assert_eq!(render_badge(&danger), "[badge] 2.98 (#FF0000)");
    }

    #[test]
    fn test_weights_rendering() {
        let text = render_weights(&WeightTable::default());
        assert!(text.starts_with("Weight table v1"));
        assert!(text.contains("168.00"));
    }
}
