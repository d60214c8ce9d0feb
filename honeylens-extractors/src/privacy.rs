//! Privacy invasion detection

use honeylens_core::SignalName;
use honeylens_dom::Page;
use scraper::Selector;
use std::sync::LazyLock;

use crate::forms::PERSONAL_INPUTS;
use crate::traits::flag;
use crate::{Reading, SignalExtractor};

const PRIVACY_CAP: u32 = 4;
const PERSONAL_INPUT_THRESHOLD: usize = 5;
const SOCIAL_LINK_THRESHOLD: usize = 3;

static SOCIAL_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"a[href*="facebook"], a[href*="twitter"], a[href*="linkedin"], a[href*="instagram"]"#,
    )
    .unwrap()
});

/// Consent banners, personal data, social widgets and location prompts
#[derive(Debug, Default)]
pub struct PrivacyExtractor;

impl SignalExtractor for PrivacyExtractor {
    fn id(&self) -> &str {
        "privacy"
    }

    fn signals(&self) -> &'static [SignalName] {
        &[SignalName::PrivacyInvasionScore]
    }

    fn extract(&self, page: &Page) -> Vec<Reading> {
        let text = page.visible_text().to_lowercase();

        let score = flag(text.contains("cookie") && text.contains("consent"))
            + flag(page.select(&PERSONAL_INPUTS).count() > PERSONAL_INPUT_THRESHOLD)
            + flag(page.select(&SOCIAL_LINKS).count() > SOCIAL_LINK_THRESHOLD)
            + flag(text.contains("location") && text.contains("allow"));

        vec![(SignalName::PrivacyInvasionScore, score.min(PRIVACY_CAP))]
    }
}
