use crate::parser::NodeRef;

/// DOM-navigation helpers implemented on [`NodeRef`].
///
/// This trait is automatically in scope when you import from
/// [`crate::parser`].
pub trait NodeExt {
    /// Return the local tag name of this node if it is an element (e.g.
    /// `"div"`, `"p"`), or `None` for text / comment / document nodes.
    fn element_name(&self) -> Option<&str>;

    /// Look up an attribute by name and return its value, or `None` if the
    /// attribute is absent or this is not an element node.
    fn attr_value(&self, name: &str) -> Option<String>;

    /// The concatenated text of this node and all its descendants with
    /// leading and trailing whitespace removed.
    fn trimmed_text(&self) -> String;

    /// Like [`NodeExt::trimmed_text`], but ruby annotations (`<rt>`, `<rp>`)
    /// are left out so furigana never ends up inside the prose.
    fn prose_text(&self) -> String;
}

fn push_prose(node: &NodeRef, out: &mut String) {
    if let Some(text) = node.as_text() {
        out.push_str(&text.borrow());
        return;
    }
    for child in node.children() {
        if !matches!(child.element_name(), Some("rt") | Some("rp")) {
            push_prose(&child, out);
        }
    }
}

impl NodeExt for NodeRef {
    fn element_name(&self) -> Option<&str> {
        self.as_element().map(|e| e.name.local.as_ref())
    }

    fn attr_value(&self, name: &str) -> Option<String> {
        self.as_element()
            .and_then(|e| e.attributes.borrow().get(name).map(|v| v.to_string()))
    }

    fn trimmed_text(&self) -> String {
        self.text_contents().trim().to_string()
    }

    fn prose_text(&self) -> String {
        let mut out = String::new();
        push_prose(self, &mut out);
        out.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;

    #[test]
    fn element_name_is_none_for_text_nodes() {
        let doc = parse_html("<div>text</div>");
        let div = doc.select_first("div").unwrap().as_node().clone();
        assert_eq!(div.element_name(), Some("div"));
        let text_node = div.first_child().unwrap();
        assert_eq!(text_node.element_name(), None);
        assert_eq!(text_node.attr_value("class"), None);
    }

    #[test]
    fn trimmed_text_joins_descendants() {
        let doc = parse_html("<p>  東京<b>都</b>に行く \n</p>");
        let p = doc.select_first("p").unwrap().as_node().clone();
        assert_eq!(p.trimmed_text(), "東京都に行く");
    }

    #[test]
    fn prose_text_skips_ruby_annotations() {
        let doc = parse_html("<p> <ruby>漢<rp>(</rp><rt>かん</rt><rp>)</rp>字</ruby>を学ぶ </p>");
        let p = doc.select_first("p").unwrap().as_node().clone();
        assert_eq!(p.prose_text(), "漢字を学ぶ");
        assert_eq!(p.trimmed_text(), "漢(かん)字を学ぶ");
    }
}
