//! Dark pattern detection
//!
//! Social proof pressure and confirm-shaming are page-wide checks. Payment
//! capture and buried opt-outs score once per offending form or checkbox,
//! and the total is capped.

use honeylens_core::SignalName;
use honeylens_dom::Page;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

use crate::traits::flag;
use crate::{Reading, SignalExtractor};

const DARK_PATTERN_CAP: u32 = 4;
const LONG_LABEL_CHARS: usize = 100;

static SOCIAL_PROOF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)only\s+\d+\s+viewing now|high demand|popular choice").unwrap()
});

static CONFIRM_SHAMING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)no thanks|i don't want|not interested").unwrap());

static NON_UNSUBSCRIBE_FORMS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"form:not([action*="unsubscribe"])"#).unwrap());

static CHECKBOXES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[type="checkbox"]"#).unwrap());

static LABELS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("label[for]").unwrap());

/// Forms asking for payment details
fn payment_forms(page: &Page) -> u32 {
    page.select(&NON_UNSUBSCRIBE_FORMS)
        .filter(|form| {
            let markup = form.inner_html().to_lowercase();
            markup.contains("credit card") || markup.contains("payment")
        })
        .count() as u32
}

/// The label wrapping a checkbox, or else the first label pointing at its id
fn label_for<'a>(page: &'a Page, checkbox: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let node = *checkbox;
    let wrapping = node
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "label");
    if wrapping.is_some() {
        return wrapping;
    }

    let id = checkbox.value().attr("id").unwrap_or_default();
    page.select(&LABELS)
        .find(|label| label.value().attr("for") == Some(id))
}

/// Checkboxes whose label is very long or mentions opting out
fn buried_opt_outs(page: &Page) -> u32 {
    page.select(&CHECKBOXES)
        .filter(|checkbox| {
            let Some(label) = label_for(page, *checkbox) else {
                return false;
            };
            let text = page.inner_text(label);
            let lower = text.to_lowercase();
            text.chars().count() > LONG_LABEL_CHARS
                || lower.contains("opt out")
                || lower.contains("unsubscribe")
        })
        .count() as u32
}

/// Social proof, payment capture, buried opt-outs and confirm-shaming
#[derive(Debug, Default)]
pub struct DarkPatternExtractor;

impl SignalExtractor for DarkPatternExtractor {
    fn id(&self) -> &str {
        "dark-patterns"
    }

    fn signals(&self) -> &'static [SignalName] {
        &[SignalName::DarkPatternScore]
    }

    fn extract(&self, page: &Page) -> Vec<Reading> {
        let text = page.visible_text();

        let score = flag(SOCIAL_PROOF.is_match(text))
            + payment_forms(page)
            + buried_opt_outs(page)
            + flag(CONFIRM_SHAMING.is_match(text));

        vec![(SignalName::DarkPatternScore, score.min(DARK_PATTERN_CAP))]
    }
}
