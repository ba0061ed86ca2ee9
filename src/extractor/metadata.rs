use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::models::ExtractOptions;
use crate::parser::{NodeExt, NodeRef};
use crate::utils::{
    normalize_text, select_descendants, select_first_descendant, to_absolute_uri,
};

use regex::Regex;
use std::sync::LazyLock;

pub static CATEGORY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"cate:\s*['"]?(\d+)['"]?"#).unwrap());
pub static IMAGE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"img\s*:\s*['"]([^'"]+)['"]"#).unwrap());

/// Article metadata gathered from the page.  Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub publish_date: String,
    pub author: String,
    pub category: String,
    pub image_url: String,
    pub summary: String,
    pub tags: Vec<String>,
}

/// Headline element first, then `og:title`, `<meta name="title">`, and
/// finally the document `<title>`.  First non-empty candidate wins.  Only
/// the first headline match is considered; when it is empty the meta tags
/// take over.
pub fn get_title(doc: &NodeRef, options: &ExtractOptions, logger: &PerfLogger) -> String {
    start_span!(logger, GET_TITLE);
    let title = select_first_descendant(doc, options.title_selector.as_str())
        .map(|headline| headline.trimmed_text())
        .filter(|headline| !headline.is_empty())
        .or_else(|| meta_content(doc, r#"meta[property="og:title"]"#))
        .or_else(|| meta_content(doc, r#"meta[name="title"]"#))
        .or_else(|| first_text(doc, &["title"], |_| true))
        .map(|title| normalize_text(title.as_str()))
        .unwrap_or_default();
    end_span!(logger, GET_TITLE);
    title
}

pub fn get_metadata(
    doc: &NodeRef,
    doc_uri: &str,
    options: &ExtractOptions,
    logger: &PerfLogger,
) -> Metadata {
    start_span!(logger, GET_METADATA);

    let publish_date = first_text(doc, &options.date_selectors, |_| true)
        .or_else(|| meta_content(doc, r#"meta[property="article:published_time"]"#))
        .unwrap_or_default();
    add_point_to_span_str!(logger, GET_METADATA, "publish_date_done");

    // for logging purposes
    let mut rejected_bylines = 0;
    let publisher = options.publisher_name.as_str();
    let author = first_text(doc, &options.author_selectors, |text| {
        let accepted = publisher.is_empty() || !text.contains(publisher);
        if !accepted {
            d!({
                rejected_bylines += 1;
            });
        }
        accepted
    })
    .unwrap_or_default();
    add_point_to_span!(
        logger,
        GET_METADATA,
        format!("author_done, rejected {} publisher bylines", rejected_bylines)
    );

    let detail_script = detail_script(doc, options.detail_script_marker.as_str());
    let category = detail_script
        .as_deref()
        .and_then(|script| category_from_script(script, options))
        .unwrap_or_default();

    let image_url = detail_script
        .as_deref()
        .and_then(|script| IMAGE_PATH.captures(script))
        .and_then(|caps| caps.get(1))
        .map(|path| to_absolute_uri(path.as_str(), options.image_base_url.as_str()))
        .or_else(|| {
            meta_content(doc, r#"meta[property="og:image"]"#)
                .map(|src| to_absolute_uri(src.as_str(), doc_uri))
        })
        .unwrap_or_default();
    add_point_to_span_str!(logger, GET_METADATA, "detail_script_done");

    let summary = first_text(doc, &[options.summary_selector.as_str()], |_| true)
        .or_else(|| meta_content(doc, r#"meta[property="og:description"]"#))
        .or_else(|| meta_content(doc, r#"meta[name="description"]"#))
        .unwrap_or_default();

    let tags = get_tags(doc, &options.tag_selectors);

    end_span!(logger, GET_METADATA);
    Metadata {
        publish_date,
        author,
        category,
        image_url,
        summary,
        tags,
    }
}

/// Walk `selectors` in order and, within each, the matching elements in
/// document order; return the first whitespace-normalised, non-empty text
/// that `accept` agrees to.
fn first_text<S, F>(doc: &NodeRef, selectors: &[S], mut accept: F) -> Option<String>
where
    S: AsRef<str>,
    F: FnMut(&str) -> bool,
{
    for selector in selectors {
        for node in select_descendants(doc, selector.as_ref()) {
            let text = normalize_text(node.trimmed_text().as_str());
            if !text.is_empty() && accept(text.as_str()) {
                return Some(text);
            }
        }
    }
    None
}

/// The trimmed `content` of the first matching `<meta>` that has one.
fn meta_content(doc: &NodeRef, selector: &str) -> Option<String> {
    select_descendants(doc, selector)
        .iter()
        .filter_map(|meta| meta.attr_value("content"))
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
}

/// Text of the first inline `<script>` containing `marker`.
fn detail_script(doc: &NodeRef, marker: &str) -> Option<String> {
    if marker.is_empty() {
        return None;
    }
    select_descendants(doc, "script")
        .iter()
        .map(|script| script.text_contents())
        .find(|text| text.contains(marker))
}

fn category_from_script(script: &str, options: &ExtractOptions) -> Option<String> {
    let code = CATEGORY_CODE.captures(script)?.get(1)?.as_str();
    Some(
        options
            .categories
            .get(code)
            .cloned()
            .unwrap_or_else(|| format!("cate-{}", code)),
    )
}

/// All texts of the first tag selector that yields any.
fn get_tags(doc: &NodeRef, selectors: &[String]) -> Vec<String> {
    for selector in selectors {
        let tags = select_descendants(doc, selector.as_str())
            .iter()
            .map(|tag| normalize_text(tag.trimmed_text().as_str()))
            .filter(|tag| !tag.is_empty())
            .collect::<Vec<_>>();
        if !tags.is_empty() {
            return tags;
        }
    }
    vec![]
}
