//! Hidden content detection

use honeylens_core::SignalName;
use honeylens_dom::Page;

use crate::traits::flag;
use crate::{Reading, SignalExtractor};

const HIDDEN_THRESHOLD: usize = 20;
const HOVER_REVEALED_THRESHOLD: usize = 7;
const HIDDEN_TEXT_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HiddenCounts {
    /// Elements computing to invisible
    pub hidden: usize,
    /// `display:none` elements that become displayed on hover
    pub hover_revealed: usize,
    /// Invisible elements carrying non-blank text
    pub hidden_with_text: usize,
}

impl HiddenCounts {
    pub fn score(&self) -> u32 {
        flag(self.hidden > HIDDEN_THRESHOLD)
            + flag(self.hover_revealed > HOVER_REVEALED_THRESHOLD)
            + flag(self.hidden_with_text > HIDDEN_TEXT_THRESHOLD)
    }
}

/// Count invisible elements across the whole document, head included
pub fn count_hidden(page: &Page) -> HiddenCounts {
    let mut counts = HiddenCounts::default();

    for element in page.elements() {
        let style = page.computed_style(element);
        if !style.is_hidden() {
            continue;
        }

        counts.hidden += 1;

        if style.display == "none" && page.hover_style(element).display != "none" {
            counts.hover_revealed += 1;
        }

        if element.text().any(|t| !t.trim().is_empty()) {
            counts.hidden_with_text += 1;
        }
    }

    counts
}

/// Invisible and hover-revealed elements
#[derive(Debug, Default)]
pub struct HiddenContentExtractor;

impl SignalExtractor for HiddenContentExtractor {
    fn id(&self) -> &str {
        "hidden-content"
    }

    fn signals(&self) -> &'static [SignalName] {
        &[SignalName::HiddenContentScore]
    }

    fn extract(&self, page: &Page) -> Vec<Reading> {
        vec![(SignalName::HiddenContentScore, count_hidden(page).score())]
    }
}
