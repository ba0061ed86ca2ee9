//! Article extraction and vocabulary highlighting for Japanese news pages.
//!
//! ## Quick start
//!
//! ```rust
//! use kiji_rs::highlighter::{resolve_spans, VocabCandidate};
//! use kiji_rs::{extract, ExtractOptions};
//!
//! let html = r#"<div class="content--detail-more"><section class="content--body">
//!   <div class="body-text"><p>東京都に行きました。</p></div>
//! </section></div>"#;
//! let article = extract(html, "https://www3.nhk.or.jp/news/", ExtractOptions::default());
//! assert_eq!(article.sentences, vec!["東京都に行きました。"]);
//!
//! let candidates = vec![VocabCandidate::new("東京", 0), VocabCandidate::new("東京都", 1)];
//! let ranges = resolve_spans(&article.sentences[0], &candidates);
//! assert_eq!((ranges[0].start, ranges[0].end, ranges[0].candidate_index), (0, 3, 1));
//! ```
//!
//! ## Module layout
//!
//! * **Top level** – [`extract`] turns page markup into an [`ExtractedArticle`].
//!   [`ExtractOptions`] carries the site profile.
//! * [`segmenter`] – content normalisation and paragraph / sentence splitting.
//! * [`highlighter`] – resolves vocabulary surface forms to non-overlapping
//!   character ranges within a sentence.
//! * [`analysis`] – builds generative-model analysis requests from an article
//!   and parses the vocabulary / grammar reply.
//! * [`parser`] – thin wrappers around the underlying HTML parser.

macro_rules! d {
    ($code:block) => {
        if cfg!(debug_assertions) {
            $code
        }
    };
}

#[macro_use]
mod logging;
mod extractor;

mod models;
mod node_utils;
mod utils;

pub mod analysis;
pub mod error;
pub mod highlighter;
pub mod segmenter;

pub use error::AnalysisError;
pub use models::{ExtractOptions, ExtractedArticle, RawDocument};
pub use node_utils::NodeExt;

/// Thin wrappers around the underlying HTML parser.
///
/// [`NodeRef`] is the reference-counted DOM node type used throughout the crate.
/// [`parse_html`] parses a complete HTML document into a [`NodeRef`] tree.
pub mod parser {
    use kuchikikiki::traits::TendrilSink;
    pub use kuchikikiki::NodeRef;
    pub use crate::node_utils::NodeExt;

    /// Parse an HTML string into a [`NodeRef`] document tree.
    ///
    /// The parser follows the HTML5 specification; an implicit `<html>`, `<head>`,
    /// and `<body>` are synthesised when missing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kiji_rs::parser::parse_html;
    ///
    /// let doc = parse_html("<div><p>hello</p></div>");
    /// assert!(doc.select_first("p").is_ok());
    /// ```
    pub fn parse_html(html: &str) -> NodeRef {
        kuchikikiki::parse_html().one(html)
    }
}

/// Extract a news article from an HTML page.
///
/// Never fails: malformed markup is parsed leniently and anything that
/// cannot be found is left empty in the returned [`ExtractedArticle`].
///
/// # Arguments
///
/// * `html_str` – the raw HTML source of the page.
/// * `doc_uri` – the URL the page was fetched from.  Used to resolve a
///   relative `og:image`.
/// * `options` – the site profile.  [`ExtractOptions::default()`] targets
///   NHK News Web.
///
/// # Examples
///
/// ```rust
/// use kiji_rs::{extract, ExtractOptions};
///
/// let article = extract("<p>no article here</p>", "https://example.com", ExtractOptions::default());
/// assert!(article.content.is_empty());
/// assert!(article.sentences.is_empty());
/// ```
pub fn extract(html_str: &str, doc_uri: &str, options: ExtractOptions) -> ExtractedArticle {
    let processor = extractor::Extractor::new(html_str, doc_uri.to_string(), options);
    processor.extract()
}

/// [`extract`] for a [`RawDocument`].
pub fn extract_document(document: &RawDocument, options: ExtractOptions) -> ExtractedArticle {
    extract(document.html.as_str(), document.source_url.as_str(), options)
}
