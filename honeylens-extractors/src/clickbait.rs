//! Clickbait heading detection

use honeylens_core::SignalName;
use honeylens_dom::Page;
use scraper::Selector;
use std::sync::LazyLock;

use crate::{Reading, SignalExtractor};

const CLICKBAIT_CAP: u32 = 3;

pub const CLICKBAIT_PHRASES: &[&str] = &[
    "you won't believe",
    "shocking",
    "mind-blowing",
    "unbelievable",
    "incredible",
    "amazing",
    "jaw-dropping",
    "secret",
    "trick",
    "hack",
];

static HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

/// Headings using sensational phrasing
#[derive(Debug, Default)]
pub struct ClickbaitExtractor;

impl SignalExtractor for ClickbaitExtractor {
    fn id(&self) -> &str {
        "clickbait"
    }

    fn signals(&self) -> &'static [SignalName] {
        &[SignalName::ClickbaitScore]
    }

    fn extract(&self, page: &Page) -> Vec<Reading> {
        let count = page
            .select(&HEADINGS)
            .filter(|heading| {
                let text = page.inner_text(*heading).to_lowercase();
                CLICKBAIT_PHRASES.iter().any(|phrase| text.contains(phrase))
            })
            .count() as u32;

        vec![(SignalName::ClickbaitScore, count.min(CLICKBAIT_CAP))]
    }
}
