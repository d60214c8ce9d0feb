//! honeylens extractors
//!
//! Independent, stateless inspectors of a single page:
//! - **Lexical**: urgency, reward, suspicious, emotion, deception, pressure and trust phrases
//! - **Complexity**: nesting depth, element count, wide-and-deep subtrees
//! - **Hidden content**: invisible elements, hover-revealed elements, hidden text
//! - **Time pressure**: countdowns, scarcity copy, countdown widgets
//! - **Forms**: oversized forms, tracking inputs, personal-data inputs
//! - **Layout**: pinned elements, locked body, popups and modals
//! - **Dark patterns**: social proof, payment capture, buried opt-outs, confirm-shaming
//! - **Security**: plain HTTP, insecure scripts, iframes, outbound links
//! - **Clickbait**: sensational headings
//! - **Privacy**: consent banners, personal data, social widgets, location prompts
//!
//! Extractors never fail: anything missing from the document counts as zero.

pub mod traits;
pub mod lexical;
pub mod complexity;
pub mod hidden;
pub mod time_pressure;
pub mod forms;
pub mod layout;
pub mod dark_patterns;
pub mod security;
pub mod clickbait;
pub mod privacy;
pub mod set;

pub use traits::*;
pub use lexical::*;
pub use complexity::*;
pub use hidden::*;
pub use time_pressure::*;
pub use forms::*;
pub use layout::*;
pub use dark_patterns::*;
pub use security::*;
pub use clickbait::*;
pub use privacy::*;
pub use set::*;

#[cfg(test)]
pub(crate) mod test_support {
    use honeylens_dom::Page;
    use url::Url;

    pub fn page(html: &str) -> Page {
        Page::parse(html, Url::parse("https://shop.example/offer").unwrap())
    }

    pub fn page_at(html: &str, url: &str) -> Page {
        Page::parse(html, Url::parse(url).unwrap())
    }
}
