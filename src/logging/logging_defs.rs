/// Span IDs for performance-logging events.  Each ID must be unique;
/// simply increment when adding a new span.
pub const EXTRACT: u64 = 1;
pub const GET_TITLE: u64 = 2;
pub const COLLECT_BODY: u64 = 3;
pub const SEGMENT_CONTENT: u64 = 4;
pub const GET_METADATA: u64 = 5;

pub fn name(span_id: u64) -> &'static str {
    match span_id {
        EXTRACT => "EXTRACT",
        GET_TITLE => "GET_TITLE",
        COLLECT_BODY => "COLLECT_BODY",
        SEGMENT_CONTENT => "SEGMENT_CONTENT",
        GET_METADATA => "GET_METADATA",
        _ => "UNKNOWN_SPAN",
    }
}
