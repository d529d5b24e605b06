// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured inference metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn inference_metrics() -> &'static dyn MetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns a static reference to the configured channel metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn channel_metrics() -> &'static dyn MetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

// --- Trait Definitions ---

/// A sink for metrics related to policy inference calls.
pub trait InferenceMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of inference calls, labeled by outcome
    /// (`ok` or the error code of the failure).
    fn inc_inference_calls(&self, outcome: &str);
    /// Observes the wall-clock duration of one full inference call
    /// (input transform, model sampling, output transform).
    fn observe_inference_duration(&self, duration_secs: f64);
}
impl InferenceMetricsSink for NopSink {
    fn inc_inference_calls(&self, _outcome: &str) {}
    fn observe_inference_duration(&self, _duration_secs: f64) {}
}

/// A sink for metrics related to the request/reply channel.
pub trait ChannelMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of envelopes handled, labeled by label.
    fn inc_messages(&self, label: &str);
    /// Observes the payload size of a received request in bytes.
    fn observe_request_bytes(&self, bytes: u64);
    /// Increments the gauge of currently connected clients.
    fn inc_connected_clients(&self);
    /// Decrements the gauge of currently connected clients.
    fn dec_connected_clients(&self);
}
impl ChannelMetricsSink for NopSink {
    fn inc_messages(&self, _label: &str) {}
    fn observe_request_bytes(&self, _bytes: u64) {}
    fn inc_connected_clients(&self) {}
    fn dec_connected_clients(&self) {}
}

/// The unified trait bound for the global sink: one object implements every
/// sink family.
pub trait MetricsSink: InferenceMetricsSink + ChannelMetricsSink {}
impl<T: InferenceMetricsSink + ChannelMetricsSink> MetricsSink for T {}
