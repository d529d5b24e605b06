// Path: crates/telemetry/src/time.rs
use crate::sinks::{InferenceMetricsSink, MetricsSink};
use std::time::Instant;

/// Observes the duration of the enclosing scope on drop, so the
/// measurement covers every exit path including errors.
pub struct Timer<'a> {
    sink: &'a dyn MetricsSink,
    start: Instant,
}

impl<'a> Timer<'a> {
    pub fn new(sink: &'a dyn MetricsSink) -> Self {
        Self {
            sink,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_inference_duration(self.start.elapsed().as_secs_f64());
    }
}
