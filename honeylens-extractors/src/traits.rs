//! Common interface for signal extractors

use honeylens_core::SignalName;
use honeylens_dom::Page;

/// One raw signal value produced by an extractor
pub type Reading = (SignalName, u32);

/// A stateless inspector of one aspect of a page
pub trait SignalExtractor: Send + Sync {
    /// Stable extractor identifier, used in logs
    fn id(&self) -> &str;

    /// Signals this extractor reports
    fn signals(&self) -> &'static [SignalName];

    /// Inspect the page. Must not fail: missing structure contributes zero.
    fn extract(&self, page: &Page) -> Vec<Reading>;
}

/// `1` when the condition holds, `0` otherwise
pub(crate) fn flag(condition: bool) -> u32 {
    u32::from(condition)
}
