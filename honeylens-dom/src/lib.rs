//! honeylens document layer
//!
//! Provides the read-only document handle inspected by the extractors:
//! - Parsed HTML with page URL and origin
//! - An approximation of computed style from `<style>` rules and inline styles
//! - `innerText`-like visible text flattening
//! - Loading a single document from disk or over HTTP

pub mod fetch;
pub mod page;
pub mod style;
pub mod text;

pub use fetch::*;
pub use page::*;
pub use style::*;
