// Path: crates/node/src/bin/policy-server.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

use anyhow::Result;
use clap::Parser;
use pilot_server::PolicyServer;
use pilot_types::config::ServerConfig;

#[derive(Parser, Debug)]
struct ServerOpts {
    /// Interface the inference channel binds.
    #[clap(long, default_value = "0.0.0.0", env = "PILOT_HOST")]
    host: String,
    /// Port the inference channel binds.
    #[clap(long, default_value_t = 8091, env = "PILOT_PORT")]
    port: u16,
    /// Policy configuration identifier (built-in profile or TOML path).
    #[clap(long, default_value = "dualarm_base")]
    config: String,
    /// Checkpoint location: a local directory or an http(s) base URL.
    #[clap(long)]
    checkpoint_dir: String,
    /// Fetch the checkpoint into the local cache when it is missing.
    #[clap(long)]
    download_if_missing: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing FIRST
    pilot_telemetry::init::init_tracing()?;

    // 2. Install the metrics sink and spawn the telemetry server
    if let Ok(sink) = pilot_telemetry::prometheus::install() {
        let _ = pilot_telemetry::sinks::SINK.set(sink);
    }
    let telemetry_addr_str =
        std::env::var("TELEMETRY_ADDR").unwrap_or_else(|_| "127.0.0.1:9617".to_string());
    let telemetry_addr = telemetry_addr_str.parse()?;
    tokio::spawn(pilot_telemetry::http::run_server(telemetry_addr));

    let opts = ServerOpts::parse();
    tracing::info!(
        target: "policy_server",
        event = "startup",
        config = %opts.config,
        checkpoint = %opts.checkpoint_dir,
    );

    let config = ServerConfig {
        host: opts.host,
        port: opts.port,
        config_name: opts.config,
        checkpoint: opts.checkpoint_dir,
        download_if_missing: opts.download_if_missing,
    };

    let bound = PolicyServer::new(config).bind().await?;

    // Print the readiness signal for test harnesses after the listener is up.
    eprintln!("PILOT_SERVER_LISTENING_ON_{}", bound.local_addr());

    bound.serve().await
}
