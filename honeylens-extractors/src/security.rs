//! Security indicator detection

use honeylens_core::SignalName;
use honeylens_dom::Page;
use scraper::Selector;
use std::sync::LazyLock;

use crate::traits::flag;
use crate::{Reading, SignalExtractor};

const SECURITY_CAP: u32 = 4;
const IFRAME_THRESHOLD: usize = 3;
const OUTBOUND_LINK_THRESHOLD: usize = 20;

static SCRIPTS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script[src]").unwrap());
static IFRAMES: LazyLock<Selector> = LazyLock::new(|| Selector::parse("iframe").unwrap());
static HTTP_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href^="http"]"#).unwrap());

/// Scripts loaded neither from this origin nor over HTTPS
fn insecure_scripts(page: &Page, origin: &str) -> u32 {
    page.select(&SCRIPTS)
        .filter_map(|script| script.value().attr("src"))
        .filter(|src| {
            let resolved = page
                .resolve(src)
                .map(|url| url.to_string())
                .unwrap_or_else(|| src.to_string());
            !resolved.starts_with(origin) && !resolved.starts_with("https://")
        })
        .count() as u32
}

/// Plain HTTP, insecure scripts, iframes and outbound links
#[derive(Debug, Default)]
pub struct SecurityExtractor;

impl SignalExtractor for SecurityExtractor {
    fn id(&self) -> &str {
        "security"
    }

    fn signals(&self) -> &'static [SignalName] {
        &[SignalName::SecurityIndicatorScore]
    }

    fn extract(&self, page: &Page) -> Vec<Reading> {
        let origin = page.origin();

        let outbound = page
            .select(&HTTP_LINKS)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| !href.starts_with(origin.as_str()))
            .count();

        let score = flag(!page.is_https())
            + insecure_scripts(page, &origin)
            + flag(page.select(&IFRAMES).count() > IFRAME_THRESHOLD)
            + flag(outbound > OUTBOUND_LINK_THRESHOLD);

        vec![(SignalName::SecurityIndicatorScore, score.min(SECURITY_CAP))]
    }
}
