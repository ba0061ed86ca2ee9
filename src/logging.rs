pub mod logger;

pub mod logging_defs;
#[macro_use]
pub mod macros;

use logger::PerfListener;
use logging_defs::*;
use std::time::Duration;
use std::time::Instant;

/// A [`PerfListener`] that forwards every span event to `tracing` at
/// `DEBUG` level under the `kiji_rs::perf` target.  It is only installed
/// when [`crate::ExtractOptions::debug`] is set.
pub struct PerfTracingListener;

impl PerfListener for PerfTracingListener {
    fn is_interested_in_span(&self, _span_id: u64) -> bool {
        tracing::enabled!(target: "kiji_rs::perf", tracing::Level::DEBUG)
    }

    fn on_span_start(&self, span_id: u64, _start_time: Instant) {
        tracing::debug!(target: "kiji_rs::perf", span = name(span_id), "span started");
    }

    fn on_check_point(&self, span_id: u64, since_last_point: Duration, label: &str) {
        tracing::debug!(
            target: "kiji_rs::perf",
            span = name(span_id),
            point = label,
            seconds = since_last_point.as_secs_f64(),
            "check point"
        );
    }

    fn on_span_end(&self, span_id: u64, span_duration: Duration) {
        tracing::debug!(
            target: "kiji_rs::perf",
            span = name(span_id),
            seconds = span_duration.as_secs_f64(),
            "span ended"
        );
    }
}
