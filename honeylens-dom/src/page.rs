//! The document handle inspected by every extractor

use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};
use std::cell::OnceCell;
use std::path::Path;
use std::sync::LazyLock;
use url::Url;

use crate::{text, ComputedStyle, DomError, StyleMap, StyleSheet};

static STYLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("style").unwrap());
static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

/// A parsed, rendered-state approximation of one web page
pub struct Page {
    url: Url,
    source: String,
    html: Html,
    styles: StyleSheet,
    style_map: OnceCell<StyleMap>,
    visible_text: OnceCell<String>,
}

impl Page {
    /// Parse a document loaded from `url`
    pub fn parse(source: impl Into<String>, url: Url) -> Self {
        let source = source.into();
        let html = Html::parse_document(&source);

        let mut styles = StyleSheet::default();
        for style in html.select(&STYLE_SELECTOR) {
            styles.extend(&style.text().collect::<String>());
        }

        Self {
            url,
            source,
            html,
            styles,
            style_map: OnceCell::new(),
            visible_text: OnceCell::new(),
        }
    }

    /// Load a document from disk; the URL defaults to the file's `file://` URL
    pub fn from_file(path: impl AsRef<Path>, url: Option<Url>) -> Result<Self, DomError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;

        let url = match url {
            Some(url) => url,
            None => {
                let canonical = path.canonicalize()?;
                Url::from_file_path(&canonical)
                    .map_err(|_| DomError::InvalidUrl(canonical.display().to_string()))?
            }
        };

        Ok(Self::parse(source, url))
    }

    /// The same page after its markup changed
    pub fn with_source(&self, source: impl Into<String>) -> Self {
        Self::parse(source, self.url.clone())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Computed styles of all elements, resolved on first use
    pub fn style_map(&self) -> &StyleMap {
        self.style_map.get_or_init(|| self.styles.resolve_all(&self.html))
    }

    /// ASCII origin (`scheme://host[:port]`, or `null` for opaque origins)
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    pub fn is_https(&self) -> bool {
        self.url.scheme() == "https"
    }

    /// Resolve a reference against the page URL
    pub fn resolve(&self, reference: &str) -> Option<Url> {
        self.url.join(reference).ok()
    }

    pub fn body(&self) -> Option<ElementRef<'_>> {
        self.html.select(&BODY_SELECTOR).next()
    }

    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> scraper::html::Select<'a, 'b> {
        self.html.select(selector)
    }

    /// Every element in document order, `<html>` included
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    pub fn computed_style(&self, element: ElementRef<'_>) -> &ComputedStyle {
        self.style_map().get(element)
    }

    pub fn hover_style(&self, element: ElementRef<'_>) -> ComputedStyle {
        let inherited = self.style_map().parent_visibility(element);
        self.styles.resolve(element, true, inherited)
    }

    /// Flattened visible text of the body
    pub fn visible_text(&self) -> &str {
        self.visible_text.get_or_init(|| {
            self.body()
                .map(|body| text::inner_text(body, self.style_map()))
                .unwrap_or_default()
        })
    }

    /// Flattened visible text of one element
    pub fn inner_text(&self, element: ElementRef<'_>) -> String {
        text::inner_text(element, self.style_map())
    }

    /// Short content hash of the page source
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source.as_bytes());
        format!("{:x}", hasher.finalize())[..16].to_string()
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.url.as_str())
            .field("bytes", &self.source.len())
            .field("style_rules", &self.styles.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> Page {
        Page::parse(html, Url::parse("https://shop.example/deals").unwrap())
    }

    #[test]
    fn test_collects_style_rules() {
        let page = page(
            r#"<html><head><style>.a { display: none }</style></head>
            <body><style>.b { position: fixed }</style><div class="b">x</div></body></html>"#,
        );
        assert_eq!(page.styles().len(), 2);
        let div = page.select(&Selector::parse(".b").unwrap()).next().unwrap();
        assert!(page.computed_style(div).is_pinned());
    }

    #[test]
    fn test_style_map_is_shared_by_text_and_styles() {
        let page = page(
            r#"<html><head><style>.fine { visibility: hidden }</style></head>
            <body><p>Act now</p><p class="fine">cancel anytime</p></body></html>"#,
        );
        let fine = page.select(&Selector::parse(".fine").unwrap()).next().unwrap();
        assert!(page.computed_style(fine).is_hidden());
        assert_eq!(page.visible_text(), "Act now");
        assert_eq!(page.style_map().len(), page.elements().count());
    }

    #[test]
    fn test_elements_include_head() {
        let page = page("<html><head><title>t</title></head><body><p>x</p></body></html>");
        let names: Vec<_> = page.elements().map(|e| e.value().name().to_string()).collect();
        assert_eq!(names, vec!["html", "head", "title", "body", "p"]);
    }

    #[test]
    fn test_origin_and_resolution() {
        let page = page("<body></body>");
        assert_eq!(page.origin(), "https://shop.example");
        assert!(page.is_https());
        assert_eq!(
            page.resolve("/js/app.js").unwrap().as_str(),
            "https://shop.example/js/app.js"
        );
    }

    #[test]
    fn test_visible_text_is_cached_and_stable() {
        let page = page("<body><p>Limited   time</p></body>");
        assert_eq!(page.visible_text(), "Limited time");
        assert_eq!(page.visible_text(), "Limited time");
    }

    #[test]
    fn test_fingerprint_tracks_source() {
        let a = page("<body><p>one</p></body>");
        let b = a.with_source("<body><p>two</p></body>");
        assert_eq!(a.fingerprint().len(), 16);
        assert_eq!(a.fingerprint(), page("<body><p>one</p></body>").fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(b.url(), a.url());
    }

    #[test]
    fn test_from_file_uses_file_url() {
        let dir = std::env::temp_dir().join(format!("honeylens-page-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("landing.html");
        std::fs::write(&path, "<body><h1>hi</h1></body>").unwrap();

        let page = Page::from_file(&path, None).unwrap();
        assert_eq!(page.url().scheme(), "file");
        assert_eq!(page.origin(), "null");
        assert!(!page.is_https());

        std::fs::remove_dir_all(&dir).ok();
    }
}
