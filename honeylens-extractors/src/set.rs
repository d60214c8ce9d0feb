//! The standard extractor roster

use honeylens_core::{empty_breakdown, SignalBreakdown, SignalName};
use honeylens_dom::Page;
use tracing::debug;

use crate::{
    ClickbaitExtractor, ComplexityExtractor, DarkPatternExtractor, FormComplexityExtractor,
    HiddenContentExtractor, LayoutExtractor, LexicalExtractor, PrivacyExtractor,
    SecurityExtractor, SignalExtractor, TimePressureExtractor,
};

/// An ordered collection of extractors run together over one page
pub struct ExtractorSet {
    extractors: Vec<Box<dyn SignalExtractor>>,
}

impl ExtractorSet {
    /// An empty set; every signal reads zero
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// All ten extractors, covering every signal
    pub fn standard() -> Self {
        let mut set = Self::new();
        set.push(LexicalExtractor);
        set.push(ComplexityExtractor);
        set.push(HiddenContentExtractor);
        set.push(TimePressureExtractor);
        set.push(FormComplexityExtractor);
        set.push(LayoutExtractor);
        set.push(DarkPatternExtractor);
        set.push(SecurityExtractor);
        set.push(ClickbaitExtractor);
        set.push(PrivacyExtractor);
        set
    }

    pub fn push(&mut self, extractor: impl SignalExtractor + 'static) {
        self.extractors.push(Box::new(extractor));
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Signals covered by at least one extractor
    pub fn coverage(&self) -> Vec<SignalName> {
        let mut covered: Vec<_> = self
            .extractors
            .iter()
            .flat_map(|e| e.signals().iter().copied())
            .collect();
        covered.sort();
        covered.dedup();
        covered
    }

    /// Run every extractor over the page. Uncovered signals read zero.
    pub fn run(&self, page: &Page) -> SignalBreakdown {
        let mut breakdown = empty_breakdown();

        for extractor in &self.extractors {
            for (signal, value) in extractor.extract(page) {
                debug!(extractor = extractor.id(), signal = %signal, value, "Signal extracted");
                breakdown.insert(signal, value);
            }
        }

        breakdown
    }
}

impl Default for ExtractorSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ExtractorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.extractors.iter().map(|e| e.id()))
            .finish()
    }
}
