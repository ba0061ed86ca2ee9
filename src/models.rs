use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw page markup together with the URL it was fetched from.  The URL is
/// used to resolve relative image references found in page metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocument {
    pub html: String,
    pub source_url: String,
}

impl RawDocument {
    pub fn new(html: impl Into<String>, source_url: impl Into<String>) -> RawDocument {
        RawDocument {
            html: html.into(),
            source_url: source_url.into(),
        }
    }
}

/// The output of [`crate::extract`].
///
/// Every field is always present: anything the page did not provide is an
/// empty string or an empty `Vec`.  Serialises to the JSON shape consumed by
/// the rendering layer and the analysis request builder
/// (`contentParagraphs`, `contentSentences`, `publishDate`, …).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedArticle {
    pub title: String,
    /// Normalised article body: paragraphs separated by one blank line.
    pub content: String,
    #[serde(rename = "contentParagraphs")]
    pub paragraphs: Vec<String>,
    #[serde(rename = "contentSentences")]
    pub sentences: Vec<String>,
    pub publish_date: String,
    pub author: String,
    pub category: String,
    pub image_url: String,
    pub summary: String,
    pub tags: Vec<String>,
}

/// Site profile and knobs for the extractor.
///
/// [`Default`] describes NHK News Web article pages.  Profiles for other
/// layouts can be deserialised from JSON; missing keys fall back to the
/// defaults.
///
/// # Examples
///
/// ```rust
/// use kiji_rs::ExtractOptions;
///
/// let mut opts = ExtractOptions::default();
/// opts.publisher_name = String::from("Example Shimbun");
/// opts.debug = true; // forward perf spans to `tracing`
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Forward extraction perf spans to `tracing` (debug builds only).
    pub debug: bool,
    /// Selector for the headline element.  Meta tags and `<title>` are used
    /// when it matches nothing.
    pub title_selector: String,
    /// Selector for each content-body block, walked in document order.
    pub body_block_selector: String,
    /// Selector, relative to a body block, for its optional sub-heading.
    pub heading_selector: String,
    /// Selector, relative to a body block, for the node(s) holding its text.
    pub body_text_selector: String,
    /// Selector for the lead / summary paragraph.
    pub summary_selector: String,
    pub date_selectors: Vec<String>,
    pub author_selectors: Vec<String>,
    /// Author candidates containing this name are boilerplate bylines and
    /// are skipped.  Empty disables the check.
    pub publisher_name: String,
    pub tag_selectors: Vec<String>,
    /// Marker identifying the inline script that carries the page's
    /// category code and image path.
    pub detail_script_marker: String,
    /// Category code to display name.  Unknown codes render as `cate-<code>`.
    pub categories: HashMap<String, String>,
    /// Base URL the detail script's image path is resolved against.
    pub image_base_url: String,
}

impl Default for ExtractOptions {
    fn default() -> ExtractOptions {
        ExtractOptions {
            debug: false,
            title_selector: String::from(".content--detail-title > .content--title"),
            body_block_selector: String::from(".content--detail-more .content--body"),
            heading_selector: String::from(".body-title"),
            body_text_selector: String::from(".body-text"),
            summary_selector: String::from(".content--summary"),
            date_selectors: to_strings(&[
                ".publish-date",
                ".date",
                ".time",
                r#"[class*="date"]"#,
                r#"[class*="time"]"#,
                "time",
                ".article-date",
            ]),
            author_selectors: to_strings(&[
                ".author",
                ".byline",
                r#"[class*="author"]"#,
                r#"[class*="byline"]"#,
            ]),
            publisher_name: String::from("NHK"),
            tag_selectors: to_strings(&[".tags a", ".tag a", r#"[class*="tag"] a"#, ".keywords a"]),
            detail_script_marker: String::from("__DetailProp__"),
            categories: [
                ("1", "社会"),
                ("2", "生活"),
                ("3", "文化・芸術"),
                ("4", "政治"),
                ("5", "ビジネス"),
                ("6", "国際"),
                ("7", "スポーツ"),
                ("8", "気象・災害"),
            ]
            .into_iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect(),
            image_base_url: String::from("https://www3.nhk.or.jp/news/"),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
