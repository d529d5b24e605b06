// Path: crates/telemetry/src/init.rs
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Initializes the global `tracing` subscriber for the Pilot binaries.
///
/// Events are written to stderr as JSON lines with RFC 3339 timestamps and
/// their `target:` field intact, so server phase transitions and per-call
/// failures stay machine-filterable. The filter comes from `RUST_LOG`,
/// defaulting to `info`. A `log` bridge is installed as well: records from
/// `pilot-client`, which logs through the `log` facade, land in the same
/// stream.
pub fn init_tracing() -> Result<(), anyhow::Error> {
    let json_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(filter).with(json_layer);
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
