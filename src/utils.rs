use crate::parser::{NodeExt, NodeRef};

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// HTML phrasing-content tag names per the [HTML spec](https://html.spec.whatwg.org/multipage/dom.html#phrasing-content).
/// `script`, `noscript` and form controls are left out since their text is
/// never article prose.  `rt` / `rp` are ruby annotations, not phrasing
/// content.
pub static PHRASING_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "i", "kbd", "label",
        "mark", "q", "rb", "ruby", "s", "samp", "small", "span", "strong", "sub",
        "sup", "time", "u", "var",
    ])
});

static NORMALIZE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Return all descendants of `node` that match `selector`, excluding `node`
/// itself.  An invalid selector returns an empty `Vec` rather than panicking.
pub fn select_descendants(node: &NodeRef, selector: &str) -> Vec<NodeRef> {
    match node.select(selector) {
        Ok(iter) => iter
            .filter_map(|e| {
                let n = e.as_node();
                if n == node { None } else { Some(n.clone()) }
            })
            .collect(),
        Err(_) => vec![],
    }
}

/// The first descendant of `node` matching `selector`, if any.
pub fn select_first_descendant(node: &NodeRef, selector: &str) -> Option<NodeRef> {
    select_descendants(node, selector).into_iter().next()
}

/// Replace every whitespace run in `src`, single newlines and tabs
/// included, with one ASCII space.
pub fn normalize_text(src: &str) -> String {
    NORMALIZE_REGEX.replace_all(src, " ").to_string()
}

/// Return `true` if `node` is [phrasing content](https://html.spec.whatwg.org/multipage/dom.html#phrasing-content).
/// Text nodes, elements in [`PHRASING_ELEMENTS`], and `<a>` / `<del>` /
/// `<ins>` whose *entire* child list is also phrasing content all qualify.
/// `<br>` is handled by the body walker and is not reported here.
pub fn is_phrasing_content(node: &NodeRef) -> bool {
    if node.as_text().is_some() {
        return true;
    }

    if let Some(name) = node.element_name() {
        if PHRASING_ELEMENTS.contains(name) {
            return true;
        }
    }
    matches!(node.element_name(), Some("a") | Some("del") | Some("ins"))
        && test_all_siblings(node.first_child(), |n| {
            n.element_name() == Some("br") || is_phrasing_content(n)
        })
}

/// Return `true` if every sibling starting at `node` (inclusive) satisfies
/// `test_func`.  An empty sibling list (i.e. `node = None`) vacuously
/// returns `true`.
pub fn test_all_siblings<F>(node: Option<NodeRef>, test_func: F) -> bool
where
    F: Fn(&NodeRef) -> bool,
{
    let mut next = node;
    while let Some(n) = next {
        if !test_func(&n) {
            return false;
        }
        next = n.next_sibling();
    }
    true
}

/// Convert a potentially-relative URI to an absolute one against `base_uri`.
/// Absolute inputs are returned normalised; anything that cannot be resolved
/// is returned trimmed but otherwise untouched.
pub fn to_absolute_uri(uri: &str, base_uri: &str) -> String {
    let uri = uri.trim();
    if let Ok(parsed) = url::Url::parse(uri) {
        return parsed.into();
    }
    if let Ok(base) = url::Url::parse(base_uri) {
        if let Ok(joined) = base.join(uri) {
            return joined.into();
        }
    }
    uri.to_string()
}
