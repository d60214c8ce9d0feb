//! Form complexity detection

use honeylens_core::SignalName;
use honeylens_dom::Page;
use scraper::Selector;
use std::sync::LazyLock;

use crate::traits::flag;
use crate::{Reading, SignalExtractor};

const FIELDS_PER_FORM_THRESHOLD: usize = 15;
const TRACKING_INPUT_THRESHOLD: usize = 5;
const PERSONAL_INPUT_THRESHOLD: usize = 7;

static FORMS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("form").unwrap());

static FIELDS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("input, select, textarea").unwrap());

static TRACKING_INPUTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"input[type="hidden"], input[name*="token"], input[name*="tracking"]"#)
        .unwrap()
});

/// Inputs typed for personal data; shared with the privacy extractor
pub(crate) static PERSONAL_INPUTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"input[type="text"], input[type="email"], input[type="tel"], input[type="number"]"#,
    )
    .unwrap()
});

/// Oversized forms, tracking inputs and personal-data inputs
#[derive(Debug, Default)]
pub struct FormComplexityExtractor;

impl SignalExtractor for FormComplexityExtractor {
    fn id(&self) -> &str {
        "form-complexity"
    }

    fn signals(&self) -> &'static [SignalName] {
        &[SignalName::ExcessiveFormFieldsScore]
    }

    fn extract(&self, page: &Page) -> Vec<Reading> {
        let oversized = page
            .select(&FORMS)
            .any(|form| form.select(&FIELDS).count() > FIELDS_PER_FORM_THRESHOLD);

        let mut tracking = 0;
        let mut personal = 0;
        for form in page.select(&FORMS) {
            tracking += form.select(&TRACKING_INPUTS).count();
            personal += form.select(&PERSONAL_INPUTS).count();
        }

        let score = flag(oversized)
            + flag(tracking > TRACKING_INPUT_THRESHOLD)
            + flag(personal > PERSONAL_INPUT_THRESHOLD);

        vec![(SignalName::ExcessiveFormFieldsScore, score)]
    }
}
