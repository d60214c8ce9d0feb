//! Computed style approximation
//!
//! Resolves the handful of properties the extractors care about (`display`,
//! `visibility`, `opacity`, `position`, `overflow`) from user-agent defaults,
//! author rules found in `<style>` elements, and inline `style` attributes.
//! Rules apply in source order; specificity and `!important` are ignored.

use ego_tree::NodeId;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::trace;

static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap());

/// Elements the user agent renders with `display: none`
const UA_HIDDEN_ELEMENTS: &[&str] = &[
    "head", "script", "style", "meta", "link", "title", "template", "noscript", "base",
    "datalist",
];

/// Parsed `property: value` pairs, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declarations(Vec<(String, String)>);

impl Declarations {
    /// Parse a declaration block body (`display: none; opacity: 0`)
    pub fn parse(block: &str) -> Self {
        let pairs = block
            .split(';')
            .filter_map(|declaration| {
                let (property, value) = declaration.split_once(':')?;
                let property = property.trim().to_ascii_lowercase();
                let value = strip_important(value.trim()).to_ascii_lowercase();
                if property.is_empty() || value.is_empty() {
                    return None;
                }
                Some((property, value))
            })
            .collect();

        Self(pairs)
    }

    /// Last value declared for a property
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.0.iter()
    }
}

fn strip_important(value: &str) -> &str {
    match value.to_ascii_lowercase().find("!important") {
        Some(idx) => value[..idx].trim(),
        None => value,
    }
}

/// One author rule with a single selector
#[derive(Debug, Clone)]
pub struct StyleRule {
    selector: Selector,
    hover: bool,
    declarations: Declarations,
}

/// All author rules of a document
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: Vec<StyleRule>,
}

impl StyleSheet {
    pub fn parse(css: &str) -> Self {
        let mut sheet = Self::default();
        sheet.extend(css);
        sheet
    }

    /// Append the rules of another stylesheet text
    pub fn extend(&mut self, css: &str) {
        let css = strip_comments(css);
        let mut rest = css.as_str();

        while let Some(open) = rest.find('{') {
            let prelude = rest[..open].rsplit(';').next().unwrap_or_default().trim();
            let after = &rest[open + 1..];
            let Some(close) = matching_brace(after) else {
                break;
            };
            let body = &after[..close];
            rest = &after[close + 1..];

            // @media, @keyframes, @font-face and friends
            if prelude.starts_with('@') || prelude.is_empty() {
                continue;
            }

            let declarations = Declarations::parse(body);
            if declarations.0.is_empty() {
                continue;
            }

            for selector_text in prelude.split(',') {
                let selector_text = selector_text.trim();
                let stripped = strip_hover(selector_text);
                let hover = stripped.len() != selector_text.len();
                let stripped = match stripped.trim() {
                    "" => "*",
                    s => s,
                };

                let parsed = Selector::parse(stripped);
                match parsed {
                    Ok(selector) => self.rules.push(StyleRule {
                        selector,
                        hover,
                        declarations: declarations.clone(),
                    }),
                    Err(_) => trace!("Skipping unsupported selector: {}", selector_text),
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Resolve every element of a document once, parents before children
    pub fn resolve_all(&self, html: &Html) -> StyleMap {
        let mut map = StyleMap::default();
        for node in html.tree.root().descendants() {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            let style = self.resolve(element, false, map.parent_visibility(element));
            map.styles.insert(node.id(), style);
        }
        map
    }

    /// Style of one element given the visibility its parent computed to
    pub fn resolve(
        &self,
        element: ElementRef<'_>,
        hover: bool,
        parent_visibility: &str,
    ) -> ComputedStyle {
        let mut style = ComputedStyle::default();
        if is_ua_hidden(element) {
            style.display = "none".to_string();
        }

        let mut visibility = None;
        for (property, value) in self.cascade(element, hover) {
            match property.as_str() {
                "display" => style.display = value,
                "visibility" => visibility = Some(value),
                "opacity" => style.opacity = value,
                "position" => style.position = value,
                "overflow" => style.overflow = value,
                _ => {}
            }
        }

        style.visibility = match visibility {
            Some(v) if v != "inherit" => v,
            _ => parent_visibility.to_string(),
        };

        style
    }

    /// Declarations applying to an element, lowest priority first
    fn cascade(&self, element: ElementRef<'_>, hover: bool) -> Vec<(String, String)> {
        let mut applied = Vec::new();

        for rule in &self.rules {
            if rule.hover && !hover {
                continue;
            }
            if rule.selector.matches(&element) {
                applied.extend(rule.declarations.iter().cloned());
            }
        }

        if let Some(inline) = element.value().attr("style") {
            applied.extend(Declarations::parse(inline).0);
        }

        applied
    }
}

/// Computed styles of every element of one document
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    styles: HashMap<NodeId, ComputedStyle>,
    initial: ComputedStyle,
}

impl StyleMap {
    /// Computed style of an element of the resolved document
    pub fn get(&self, element: ElementRef<'_>) -> &ComputedStyle {
        let node = *element;
        self.styles.get(&node.id()).unwrap_or(&self.initial)
    }

    /// Visibility inherited from the parent element
    pub fn parent_visibility(&self, element: ElementRef<'_>) -> &str {
        let node = *element;
        node.parent()
            .and_then(|parent| self.styles.get(&parent.id()))
            .map_or("visible", |style| style.visibility.as_str())
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }
}

fn is_ua_hidden(element: ElementRef<'_>) -> bool {
    let el = element.value();
    if UA_HIDDEN_ELEMENTS.contains(&el.name()) || el.attr("hidden").is_some() {
        return true;
    }
    el.name() == "input"
        && el
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
}

/// Remove `:hover` pseudo-classes, matched case-insensitively
fn strip_hover(selector: &str) -> String {
    let lower = selector.to_ascii_lowercase();
    let mut out = String::with_capacity(selector.len());
    let mut last = 0;
    for (idx, _) in lower.match_indices(":hover") {
        out.push_str(&selector[last..idx]);
        last = idx + ":hover".len();
    }
    out.push_str(&selector[last..]);
    out
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Index of the `}` closing a block whose `{` was just consumed
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (idx, ch) in s.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Resolved values of the properties the extractors inspect
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: String,
    pub position: String,
    pub overflow: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "inline".to_string(),
            visibility: "visible".to_string(),
            opacity: "1".to_string(),
            position: "static".to_string(),
            overflow: "visible".to_string(),
        }
    }
}

impl ComputedStyle {
    /// Numeric opacity with `parseFloat` semantics (leading numeric prefix)
    pub fn opacity_value(&self) -> Option<f64> {
        let prefix = NUMERIC_PREFIX.find(self.opacity.trim())?;
        prefix.as_str().parse().ok()
    }

    /// `display:none`, `visibility:hidden` or zero opacity
    pub fn is_hidden(&self) -> bool {
        self.display == "none" || self.visibility == "hidden" || self.opacity_value() == Some(0.0)
    }

    pub fn is_pinned(&self) -> bool {
        self.position == "sticky" || self.position == "fixed"
    }
}
