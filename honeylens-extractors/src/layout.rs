//! Layout manipulation detection

use honeylens_core::SignalName;
use honeylens_dom::Page;
use scraper::Selector;
use std::sync::LazyLock;

use crate::traits::flag;
use crate::{Reading, SignalExtractor};

const LAYOUT_CAP: u32 = 3;

static POPUPS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[class*="popup"], [class*="modal"], [id*="popup"], [id*="modal"]"#).unwrap()
});

/// Pinned elements, a locked body, and popups
#[derive(Debug, Default)]
pub struct LayoutExtractor;

impl SignalExtractor for LayoutExtractor {
    fn id(&self) -> &str {
        "layout"
    }

    fn signals(&self) -> &'static [SignalName] {
        &[SignalName::LayoutManipulationScore]
    }

    fn extract(&self, page: &Page) -> Vec<Reading> {
        let pinned = page
            .elements()
            .filter(|el| page.computed_style(*el).is_pinned())
            .count() as u32;

        let locked_body = page.body().is_some_and(|body| {
            let style = page.computed_style(body);
            style.overflow == "hidden" || style.position == "fixed"
        });

        let has_popup = page.select(&POPUPS).next().is_some();

        let score = (pinned + flag(locked_body) + flag(has_popup)).min(LAYOUT_CAP);
        vec![(SignalName::LayoutManipulationScore, score)]
    }
}
