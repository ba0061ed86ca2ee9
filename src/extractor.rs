mod body;
mod metadata;

use crate::logging::PerfTracingListener;
use crate::logging::logger::*;
use crate::logging::logging_defs::*;

use crate::models::{ExtractOptions, ExtractedArticle};
use crate::parser::parse_html;
use crate::segmenter::{normalize_content, segment};
use std::rc::Rc;

fn create_perf_logger(debug: bool) -> PerfLogger {
    let listeners = if debug {
        vec![Listener::new(Rc::new(PerfTracingListener))]
    } else {
        vec![]
    };
    PerfLogger::new(listeners)
}

pub struct Extractor<'a> {
    pub html: &'a str,
    pub doc_uri: String,
    pub options: ExtractOptions,
    logger: PerfLogger,
}

impl Extractor<'_> {
    pub fn new<'a>(html: &'a str, doc_uri: String, options: ExtractOptions) -> Extractor<'a> {
        let logger = create_perf_logger(options.debug);
        Extractor {
            html,
            doc_uri,
            options,
            logger,
        }
    }

    pub fn extract(self) -> ExtractedArticle {
        let logger = &self.logger;
        start_span!(logger, EXTRACT);
        let document = parse_html(self.html);
        add_point_to_span_str!(logger, EXTRACT, "parse_html_done");

        let title = metadata::get_title(&document, &self.options, logger);
        let raw = body::collect_body(&document, &self.options, logger);

        start_span!(logger, SEGMENT_CONTENT);
        let content = normalize_content(raw.as_str());
        let segmentation = segment(content.as_str());
        end_span!(logger, SEGMENT_CONTENT);

        let metadata =
            metadata::get_metadata(&document, self.doc_uri.as_str(), &self.options, logger);

        if title.is_empty() {
            tracing::debug!(doc_uri = %self.doc_uri, "no title found");
        }
        if content.is_empty() {
            tracing::debug!(doc_uri = %self.doc_uri, "no article body found");
        }
        end_span!(logger, EXTRACT);

        ExtractedArticle {
            title,
            content,
            paragraphs: segmentation.paragraphs,
            sentences: segmentation.sentences,
            publish_date: metadata.publish_date,
            author: metadata.author,
            category: metadata.category,
            image_url: metadata.image_url,
            summary: metadata.summary,
            tags: metadata.tags,
        }
    }
}
