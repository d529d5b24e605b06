// Path: crates/node/src/bin/policy-client.rs
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

//! A demo control-loop driver: sends sampled observations at a fixed
//! cadence and logs the shape of each returned action chunk.

use anyhow::Result;
use clap::Parser;
use pilot_client::PolicyClient;
use pilot_test_utils::sample_observation;
use std::time::Duration;

#[derive(Parser, Debug)]
struct ClientOpts {
    /// Address of the policy server.
    #[clap(long, default_value = "127.0.0.1:8091", env = "PILOT_SERVER_ADDR")]
    addr: String,
    /// Degrees of freedom of the simulated robot state.
    #[clap(long, default_value_t = 16)]
    dof: usize,
    /// Number of inference calls to make; 0 keeps going until killed.
    #[clap(long, default_value_t = 10)]
    iterations: u64,
    /// Pause between calls, in milliseconds.
    #[clap(long, default_value_t = 1000)]
    interval_ms: u64,
    /// Send an exit request to the server after the last call.
    #[clap(long)]
    exit_when_done: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    pilot_telemetry::init::init_tracing()?;
    let opts = ClientOpts::parse();

    let mut client = PolicyClient::connect(&opts.addr).await?;

    let mut sent: u64 = 0;
    loop {
        let example = sample_observation(opts.dof);
        let result = client.infer(&example).await?;
        sent += 1;
        tracing::info!(
            target: "policy_client",
            call = sent,
            rows = result.actions.nrows(),
            cols = result.actions.ncols(),
            "received action chunk"
        );
        if opts.iterations != 0 && sent >= opts.iterations {
            break;
        }
        tokio::time::sleep(Duration::from_millis(opts.interval_ms)).await;
    }

    if opts.exit_when_done {
        client.shutdown().await?;
        tracing::info!(target: "policy_client", "asked server to stop");
    }
    Ok(())
}
