use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Deref;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

/// Observer interface for performance-span events.  Implement this trait
/// and wrap it in a [`Listener`] to receive timing data from the extraction
/// pipeline.
///
/// All methods are called synchronously from the extraction code; keep
/// them lightweight.
pub trait PerfListener {
    /// Return whether this listener cares about the given span.  If `false`,
    /// none of the other callbacks will fire for that span.
    fn is_interested_in_span(&self, span_id: u64) -> bool;
    /// Called when a span begins.
    fn on_span_start(&self, span_id: u64, start_time: Instant);
    /// Called at each checkpoint within a span, with the wall-clock duration
    /// since the previous checkpoint (or span start).
    fn on_check_point(&self, span_id: u64, since_last_point: Duration, label: &str);
    /// Called when a span ends, with its total duration.
    fn on_span_end(&self, span_id: u64, span_duration: Duration);
}

/// A clonable, reference-counted wrapper around a [`PerfListener`].
#[derive(Clone)]
pub struct Listener {
    inner_impl: Rc<dyn PerfListener>,
}

impl Listener {
    pub fn new(listener: Rc<dyn PerfListener>) -> Listener {
        Listener {
            inner_impl: listener,
        }
    }
}

impl Deref for Listener {
    type Target = dyn PerfListener;
    fn deref(&self) -> &Self::Target {
        &*self.inner_impl
    }
}

struct OpenSpan {
    span_id: u64,
    start_time: Instant,
    last_point: Instant,
    listeners: Vec<Listener>,
}

impl OpenSpan {
    fn point(&mut self, label: &str) {
        let now = Instant::now();
        let since_last_point = now.duration_since(self.last_point);
        self.listeners
            .iter()
            .for_each(|l| l.on_check_point(self.span_id, since_last_point, label));
        self.last_point = now;
    }
}

/// Tracks in-flight performance spans and fans events out to registered
/// [`Listener`]s.
///
/// **Not `Send` or `Sync`**: the span map uses `RefCell`.  Each extraction
/// call creates its own `PerfLogger`.
pub struct PerfLogger {
    spans: RefCell<HashMap<u64, OpenSpan>>,
    listeners: Vec<Listener>,
}

impl PerfLogger {
    /// Create a new logger with the given set of listeners.  An empty `Vec`
    /// turns every call into a map lookup that finds nothing.
    pub fn new(listeners: Vec<Listener>) -> PerfLogger {
        PerfLogger {
            spans: RefCell::new(HashMap::new()),
            listeners,
        }
    }

    pub fn start(&self, span_id: u64) {
        let span_listeners = self
            .listeners
            .iter()
            .filter(|l| l.is_interested_in_span(span_id))
            .cloned()
            .collect::<Vec<_>>();
        if span_listeners.is_empty() {
            return;
        }
        let start_time = Instant::now();
        span_listeners
            .iter()
            .for_each(|l| l.on_span_start(span_id, start_time));
        self.spans.borrow_mut().insert(
            span_id,
            OpenSpan {
                span_id,
                start_time,
                last_point: start_time,
                listeners: span_listeners,
            },
        );
    }

    /// Record a labelled checkpoint inside the given span.  Unknown or
    /// unobserved spans are ignored.
    pub fn check_point<L: AsRef<str>>(&self, span_id: u64, label: L) {
        if let Some(span) = self.spans.borrow_mut().get_mut(&span_id) {
            span.point(label.as_ref());
        }
    }

    /// End the span, notify listeners with the total duration, and forget it.
    pub fn end(&self, span_id: u64) {
        if let Some(span) = self.spans.borrow_mut().remove(&span_id) {
            let duration = span.start_time.elapsed();
            span.listeners
                .iter()
                .for_each(|l| l.on_span_end(span_id, duration));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl PerfListener for Recorder {
        fn is_interested_in_span(&self, span_id: u64) -> bool {
            span_id == 1
        }

        fn on_span_start(&self, span_id: u64, _start_time: Instant) {
            self.events.borrow_mut().push(format!("start:{}", span_id));
        }

        fn on_check_point(&self, span_id: u64, _since_last_point: Duration, label: &str) {
            self.events
                .borrow_mut()
                .push(format!("point:{}:{}", span_id, label));
        }

        fn on_span_end(&self, span_id: u64, _span_duration: Duration) {
            self.events.borrow_mut().push(format!("end:{}", span_id));
        }
    }

    #[test]
    fn only_interesting_spans_are_reported() {
        let recorder = Rc::new(Recorder::default());
        let logger = PerfLogger::new(vec![Listener::new(recorder.clone())]);
        logger.start(1);
        logger.start(2);
        logger.check_point(1, "body_done");
        logger.check_point(2, "ignored");
        logger.end(2);
        logger.end(1);
        assert_eq!(
            *recorder.events.borrow(),
            vec!["start:1", "point:1:body_done", "end:1"]
        );
    }

    #[test]
    fn ending_twice_is_harmless() {
        let recorder = Rc::new(Recorder::default());
        let logger = PerfLogger::new(vec![Listener::new(recorder.clone())]);
        logger.start(1);
        logger.end(1);
        logger.end(1);
        assert_eq!(recorder.events.borrow().len(), 2);
    }
}
