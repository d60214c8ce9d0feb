//! Time pressure detection

use honeylens_core::SignalName;
use honeylens_dom::Page;
use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

use crate::traits::flag;
use crate::{Reading, SignalExtractor};

static COUNTDOWN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\s*:\s*){2,3}\d+").unwrap());

static SCARCITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)only\s+\d+\s+left|last\s+\d+\s+available|selling fast|almost gone").unwrap()
});

static COUNTDOWN_WIDGETS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[data-countdown], [class*="countdown"], [id*="countdown"]"#).unwrap()
});

/// Countdown clocks, scarcity copy and countdown widgets
#[derive(Debug, Default)]
pub struct TimePressureExtractor;

impl SignalExtractor for TimePressureExtractor {
    fn id(&self) -> &str {
        "time-pressure"
    }

    fn signals(&self) -> &'static [SignalName] {
        &[SignalName::TimerPresenceScore]
    }

    fn extract(&self, page: &Page) -> Vec<Reading> {
        let text = page.visible_text();

        let score = flag(COUNTDOWN_PATTERN.is_match(text))
            + flag(SCARCITY_PATTERN.is_match(text))
            + flag(page.select(&COUNTDOWN_WIDGETS).next().is_some());

        vec![(SignalName::TimerPresenceScore, score)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::page;

    fn score(html: &str) -> u32 {
        TimePressureExtractor.extract(&page(html))[0].1
    }

    #[test]
    fn test_quiet_page() {
        assert_eq!(score("<body><p>Opening hours 9 to 5</p></body>"), 0);
        // a single h:mm is not a countdown
        assert_eq!(score("<body><p>Doors open at 9:30</p></body>"), 0);
    }

    #[test]
    fn test_countdown_text() {
        assert_eq!(score("<body><p>Offer ends in 02 : 14 : 59</p></body>"), 1);
    }

    #[test]
    fn test_scarcity_copy() {
        assert_eq!(score("<body><p>ONLY 3 LEFT in stock</p></body>"), 1);
        assert_eq!(score("<body><p>Last 12 available</p></body>"), 1);
        assert_eq!(score("<body><p>Selling fast!</p></body>"), 1);
    }

    #[test]
    fn test_widget_and_all_three() {
        assert_eq!(score(r#"<body><div data-countdown="3600"></div></body>"#), 1);
        assert_eq!(
            score(r#"<body><div id="sale-countdown">01:00:00</div><p>Almost gone</p></body>"#),
            3
        );
    }
}
