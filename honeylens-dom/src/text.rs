//! Visible text flattening
//!
//! Approximates `innerText`: text nodes in document order, skipping
//! non-rendered subtrees and `display: none` elements, with whitespace
//! between block-level boxes. Text directly inside a `visibility: hidden`
//! element is dropped, but its descendants are still visited since they
//! may set `visibility: visible`. Traversal uses an explicit stack.

use scraper::node::Node;
use scraper::ElementRef;

use crate::StyleMap;

/// Elements whose content is never rendered as text
const NON_RENDERED: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that break the text flow
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "details", "dialog", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "nav", "ol", "option", "p", "pre", "section", "summary",
    "table", "td", "th", "tr", "ul",
];

enum Work<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
    Break,
}

/// Flatten the rendered text below `root`. A root that is not rendered
/// yields its raw text content instead.
pub fn inner_text(root: ElementRef<'_>, styles: &StyleMap) -> String {
    if styles.get(root).display == "none" {
        return normalize_whitespace(&root.text().collect::<String>());
    }

    let mut out = String::new();
    let mut stack = vec![Work::Element(root)];

    while let Some(work) = stack.pop() {
        match work {
            Work::Text(text) => out.push_str(text),
            Work::Break => out.push(' '),
            Work::Element(element) => {
                let name = element.value().name();
                let style = styles.get(element);
                if NON_RENDERED.contains(&name) || style.display == "none" {
                    continue;
                }
                let shows_text = style.visibility != "hidden";

                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    stack.push(Work::Break);
                }

                let node = *element;
                let children: Vec<_> = node.children().collect();
                for child in children.into_iter().rev() {
                    match child.value() {
                        Node::Text(text) if shows_text => stack.push(Work::Text(&**text)),
                        Node::Element(_) => {
                            if let Some(child_element) = ElementRef::wrap(child) {
                                stack.push(Work::Element(child_element));
                            }
                        }
                        _ => {}
                    }
                }

                if block {
                    stack.push(Work::Break);
                }
            }
        }
    }

    normalize_whitespace(&out)
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
