use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::models::ExtractOptions;
use crate::parser::{NodeExt, NodeRef};
use crate::utils::{is_phrasing_content, select_descendants, select_first_descendant};

/// Walk every content-body block in document order and flatten it into a
/// raw text buffer.
///
/// Layout of the buffer:
/// * a block's sub-heading becomes `\n【heading】\n\n`;
/// * text nodes and inline elements are appended trimmed, without ruby
///   readings (`<rt>` / `<rp>`);
/// * `<br>` appends `\n`;
/// * `<p>` appends its trimmed text followed by `\n\n`;
/// * every block ends with `\n\n`.
///
/// The buffer is not normalised; see [`crate::segmenter::normalize_content`].
pub fn collect_body(doc: &NodeRef, options: &ExtractOptions, logger: &PerfLogger) -> String {
    start_span!(logger, COLLECT_BODY);
    let mut buffer = String::new();
    let blocks = select_descendants(doc, options.body_block_selector.as_str());
    for block in &blocks {
        append_block(&mut buffer, block, options);
    }
    add_point_to_span!(
        logger,
        COLLECT_BODY,
        format!("walked {} blocks into {} bytes", blocks.len(), buffer.len())
    );
    end_span!(logger, COLLECT_BODY);
    buffer
}

fn append_block(buffer: &mut String, block: &NodeRef, options: &ExtractOptions) {
    if let Some(heading) = select_first_descendant(block, options.heading_selector.as_str()) {
        let heading = heading.trimmed_text();
        if !heading.is_empty() {
            buffer.push_str("\n【");
            buffer.push_str(&heading);
            buffer.push_str("】\n\n");
        }
    }

    for body_text in select_descendants(block, options.body_text_selector.as_str()) {
        for child in body_text.children() {
            append_node(buffer, &child);
        }
    }

    if !buffer.is_empty() && !buffer.ends_with("\n\n") {
        buffer.push_str("\n\n");
    }
}

fn append_node(buffer: &mut String, node: &NodeRef) {
    match node.element_name() {
        Some("br") => buffer.push('\n'),
        Some("p") => {
            let text = node.prose_text();
            if !text.is_empty() {
                buffer.push_str(&text);
                buffer.push_str("\n\n");
            }
        }
        _ if is_phrasing_content(node) => buffer.push_str(&node.prose_text()),
        // block-level leftovers (figures, tables, embeds) are not prose
        _ => {}
    }
}
