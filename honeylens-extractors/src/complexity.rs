//! DOM complexity measurement
//!
//! Walks the body subtree once with an explicit work-stack, so adversarially
//! deep documents cannot exhaust the call stack.

use honeylens_core::SignalName;
use honeylens_dom::Page;
use scraper::ElementRef;

use crate::traits::flag;
use crate::{Reading, SignalExtractor};

const MAX_DEPTH_THRESHOLD: usize = 15;
const NODE_COUNT_THRESHOLD: usize = 2000;
const SUSPICIOUS_SUBTREE_THRESHOLD: usize = 7;

/// A subtree is "wide and deep" below this depth...
const WIDE_DEEP_MIN_DEPTH: usize = 7;
/// ...with more direct child nodes than this
const WIDE_DEEP_MIN_CHILDREN: usize = 15;

/// Raw structural measurements of a subtree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomMetrics {
    pub max_depth: usize,
    pub node_count: usize,
    pub suspicious_structures: usize,
}

impl DomMetrics {
    /// Number of measurements above their thresholds (0-3)
    pub fn score(&self) -> u32 {
        flag(self.max_depth > MAX_DEPTH_THRESHOLD)
            + flag(self.node_count > NODE_COUNT_THRESHOLD)
            + flag(self.suspicious_structures > SUSPICIOUS_SUBTREE_THRESHOLD)
    }
}

/// Measure the subtree rooted at `root`, which sits at depth 0
pub fn measure(root: ElementRef<'_>) -> DomMetrics {
    let mut metrics = DomMetrics::default();
    let mut stack = vec![(root, 0usize)];

    while let Some((element, depth)) = stack.pop() {
        metrics.node_count += 1;
        metrics.max_depth = metrics.max_depth.max(depth);

        let node = *element;
        if depth > WIDE_DEEP_MIN_DEPTH && node.children().count() > WIDE_DEEP_MIN_CHILDREN {
            metrics.suspicious_structures += 1;
        }

        stack.extend(
            node.children()
                .filter_map(ElementRef::wrap)
                .map(|child| (child, depth + 1)),
        );
    }

    metrics
}

/// Nesting depth, element count and wide-and-deep subtrees
#[derive(Debug, Default)]
pub struct ComplexityExtractor;

impl SignalExtractor for ComplexityExtractor {
    fn id(&self) -> &str {
        "complexity"
    }

    fn signals(&self) -> &'static [SignalName] {
        &[SignalName::DomComplexityScore]
    }

    fn extract(&self, page: &Page) -> Vec<Reading> {
        let score = page.body().map(|body| measure(body).score()).unwrap_or(0);
        vec![(SignalName::DomComplexityScore, score)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::page;

    fn nested(depth: usize, leaf: &str) -> String {
        format!("{}{}{}", "<div>".repeat(depth), leaf, "</div>".repeat(depth))
    }

    #[test]
    fn test_simple_body() {
        let page = page("<body><p>one</p><p>two</p></body>");
        let metrics = measure(page.body().unwrap());
        assert_eq!(metrics.node_count, 3);
        assert_eq!(metrics.max_depth, 1);
        assert_eq!(metrics.score(), 0);
    }

    #[test]
    fn test_deep_nesting() {
        let page = page(&format!("<body>{}</body>", nested(16, "x")));
        let metrics = measure(page.body().unwrap());
        assert_eq!(metrics.max_depth, 16);
        assert_eq!(ComplexityExtractor.extract(&page), vec![(SignalName::DomComplexityScore, 1)]);
    }

    #[test]
    fn test_pathological_depth_does_not_overflow() {
        let page = page(&format!("<body>{}</body>", nested(5_000, "x")));
        let metrics = measure(page.body().unwrap());
        assert!(metrics.max_depth > MAX_DEPTH_THRESHOLD);
        assert_eq!(metrics.node_count, 5_001);
        assert_eq!(metrics.score(), 2);
    }

    #[test]
    fn test_large_document() {
        let page = page(&format!("<body>{}</body>", "<span>x</span>".repeat(2100)));
        let metrics = measure(page.body().unwrap());
        assert_eq!(metrics.node_count, 2101);
        assert_eq!(metrics.score(), 1);
    }

    #[test]
    fn test_wide_and_deep_subtrees() {
        let wide = format!("<ul>{}</ul>", "<li>x</li>".repeat(16));
        let page = page(&format!("<body>{}</body>", nested(8, &wide.repeat(8))));
        let metrics = measure(page.body().unwrap());
        assert_eq!(metrics.suspicious_structures, 8);
        assert_eq!(metrics.score(), 1);
    }

    #[test]
    fn test_text_nodes_count_as_children() {
        // 8 spans interleaved with 8 text nodes: 16 child nodes at depth 8
        let row = "t<span>x</span>".repeat(8);
        let page = page(&format!("<body>{}</body>", nested(8, &row)));
        let metrics = measure(page.body().unwrap());
        assert_eq!(metrics.suspicious_structures, 1);
    }
}
