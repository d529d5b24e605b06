// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_gauge, register_histogram, register_int_counter_vec, Gauge,
    Histogram, IntCounterVec,
};

// --- Metric Statics ---
// We use OnceCell to hold the metric collectors. They will be initialized
// exactly once by the `install` function.

static INFERENCE_CALLS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static INFERENCE_DURATION_SECONDS: OnceCell<Histogram> = OnceCell::new();
static CHANNEL_MESSAGES_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static CHANNEL_REQUEST_BYTES: OnceCell<Histogram> = OnceCell::new();
static CHANNEL_CONNECTED_CLIENTS: OnceCell<Gauge> = OnceCell::new();

#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

/// Helper macro to reduce boilerplate for getting a metric from OnceCell.
/// This will panic if `install()` has not been called, which is intentional
/// as it indicates a critical application setup error.
macro_rules! get_metric {
    ($metric:ident) => {
        $metric
            .get()
            .expect("Prometheus sink not initialized. Call telemetry::prometheus::install() first.")
    };
}

#[allow(clippy::expect_used)]
impl InferenceMetricsSink for PrometheusSink {
    fn inc_inference_calls(&self, outcome: &str) {
        get_metric!(INFERENCE_CALLS_TOTAL)
            .with_label_values(&[outcome])
            .inc();
    }
    fn observe_inference_duration(&self, duration_secs: f64) {
        get_metric!(INFERENCE_DURATION_SECONDS).observe(duration_secs);
    }
}

#[allow(clippy::expect_used)]
impl ChannelMetricsSink for PrometheusSink {
    fn inc_messages(&self, label: &str) {
        get_metric!(CHANNEL_MESSAGES_TOTAL)
            .with_label_values(&[label])
            .inc();
    }
    fn observe_request_bytes(&self, bytes: u64) {
        get_metric!(CHANNEL_REQUEST_BYTES).observe(bytes as f64);
    }
    fn inc_connected_clients(&self) {
        get_metric!(CHANNEL_CONNECTED_CLIENTS).inc();
    }
    fn dec_connected_clients(&self) {
        get_metric!(CHANNEL_CONNECTED_CLIENTS).dec();
    }
}

/// Initializes all Prometheus metrics collectors and returns a static reference to the sink.
/// This function must be called only once at application startup.
#[allow(clippy::expect_used)]
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    INFERENCE_CALLS_TOTAL
        .set(register_int_counter_vec!(
            "pilot_inference_calls_total",
            "Total inference calls served, labeled by outcome.",
            &["outcome"]
        )?)
        .expect("static already initialized");
    INFERENCE_DURATION_SECONDS
        .set(register_histogram!(
            "pilot_inference_duration_seconds",
            "Latency of one full inference call (transforms and sampling).",
            exponential_buckets(0.002, 2.0, 15)?
        )?)
        .expect("static already initialized");
    CHANNEL_MESSAGES_TOTAL
        .set(register_int_counter_vec!(
            "pilot_channel_messages_total",
            "Total envelopes handled on the inference channel, by label.",
            &["label"]
        )?)
        .expect("static already initialized");
    CHANNEL_REQUEST_BYTES
        .set(register_histogram!(
            "pilot_channel_request_bytes",
            "Serialized payload size of received requests.",
            exponential_buckets(1024.0, 4.0, 10)?
        )?)
        .expect("static already initialized");
    CHANNEL_CONNECTED_CLIENTS
        .set(register_gauge!(
            "pilot_channel_connected_clients",
            "Current number of connected inference clients."
        )?)
        .expect("static already initialized");

    static SINK: PrometheusSink = PrometheusSink;
    Ok(&SINK)
}
