// Path: crates/server/src/lib.rs
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

//! # Pilot Server
//!
//! The long-lived inference service: one process, one loaded policy, one
//! client at a time, strict request/reply alternation.
//!
//! The lifecycle is an explicit three-phase state machine:
//!
//! 1. **Loading**: resolve the policy profile and checkpoint and build the
//!    [`TrainedPolicy`]. Any failure here is fatal and the process never
//!    starts listening.
//! 2. **Serving**: bound and accepting. Each request is served fully
//!    before the next is read; there is no queue and no concurrent
//!    inference. Per-call failures are answered with an `error` envelope
//!    and the loop keeps serving. An `exit` request transitions out without
//!    a reply.
//! 3. **Stopped**: listener and policy are dropped; further connection
//!    attempts are refused by the OS.

use anyhow::{Context, Result};
use pilot_ipc::wire::{Reply, Request};
use pilot_ipc::{read_envelope, write_envelope};
use pilot_policy::{checkpoint, create_trained_policy, get_config, TrainedPolicy};
use pilot_telemetry::channel_metrics;
use pilot_telemetry::sinks::ChannelMetricsSink;
use pilot_types::config::ServerConfig;
use pilot_types::error::ChannelError;
use std::fmt;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};

/// The server lifecycle phase, used for structured transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServePhase {
    /// Resolving and loading the policy; nothing is listening yet.
    Loading,
    /// Bound and answering requests.
    Serving,
    /// Resources released; the process is on its way out.
    Stopped,
}

impl fmt::Display for ServePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServePhase::Loading => write!(f, "loading"),
            ServePhase::Serving => write!(f, "serving"),
            ServePhase::Stopped => write!(f, "stopped"),
        }
    }
}

/// How one client connection ended.
enum ConnectionEnd {
    /// The peer asked the whole server to stop.
    ExitRequested,
    /// The peer hung up; the server returns to accepting.
    Disconnected,
}

/// A configured but not yet started server.
pub struct PolicyServer {
    config: ServerConfig,
}

impl PolicyServer {
    /// A server for the given startup configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Runs the Loading phase: profile resolution, checkpoint resolution,
    /// model load, and then the bind, strictly after a successful load.
    ///
    /// Failing anywhere in here returns without ever having listened,
    /// which is what lets a caller distinguish "server refused to start"
    /// from "server died mid-service".
    pub async fn bind(self) -> Result<BoundServer> {
        tracing::info!(target: "server", phase = %ServePhase::Loading, config = %self.config.config_name, "starting");

        let profile = get_config(&self.config.config_name)?;
        let checkpoint_dir =
            checkpoint::resolve(&self.config.checkpoint, self.config.download_if_missing)?;
        let policy = create_trained_policy(&profile, &checkpoint_dir)?;

        let listener = TcpListener::bind(self.config.bind_addr())
            .await
            .with_context(|| format!("failed to bind {}", self.config.bind_addr()))?;
        let local_addr = listener.local_addr().context("listener has no local addr")?;
        tracing::info!(target: "server", phase = %ServePhase::Serving, addr = %local_addr, "listening");

        Ok(BoundServer {
            listener,
            policy,
            local_addr,
        })
    }

    /// Binds with an already-loaded policy instead of resolving one from
    /// the configuration. Embedders and tests use this to skip checkpoint
    /// I/O; the phase contract is unchanged.
    pub async fn bind_with_policy(self, policy: TrainedPolicy) -> Result<BoundServer> {
        let listener = TcpListener::bind(self.config.bind_addr())
            .await
            .with_context(|| format!("failed to bind {}", self.config.bind_addr()))?;
        let local_addr = listener.local_addr().context("listener has no local addr")?;
        tracing::info!(target: "server", phase = %ServePhase::Serving, addr = %local_addr, "listening");
        Ok(BoundServer {
            listener,
            policy,
            local_addr,
        })
    }

    /// Loads, serves until an `exit` request, and releases everything.
    pub async fn run(self) -> Result<()> {
        self.bind().await?.serve().await
    }
}

/// A server in its Serving phase: bound, policy loaded.
pub struct BoundServer {
    listener: TcpListener,
    policy: TrainedPolicy,
    local_addr: SocketAddr,
}

impl BoundServer {
    /// The address actually bound, useful when the configured port was 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves until a client sends `exit`, then drops the listener and the
    /// policy and returns.
    ///
    /// One connection is held at a time. A peer that disconnects without
    /// `exit` sends the loop back to accept; framing corruption costs the
    /// offending peer its connection but not the server its life.
    pub async fn serve(self) -> Result<()> {
        let BoundServer {
            listener, policy, ..
        } = self;

        loop {
            let (stream, peer) = listener
                .accept()
                .await
                .context("accept on inference channel failed")?;
            tracing::info!(target: "server", peer = %peer, "client connected");
            channel_metrics().inc_connected_clients();

            let end = serve_connection(&policy, stream).await;
            channel_metrics().dec_connected_clients();

            match end {
                Ok(ConnectionEnd::ExitRequested) => {
                    tracing::info!(target: "server", peer = %peer, "exit requested");
                    break;
                }
                Ok(ConnectionEnd::Disconnected) => {
                    tracing::info!(target: "server", peer = %peer, "client disconnected");
                }
                Err(e) => {
                    tracing::warn!(target: "server", peer = %peer, error = %e, "connection dropped");
                }
            }
        }

        // Stopped: listener and policy go out of scope here, on this path
        // and on every error path above, so the port is released and the
        // model memory freed no matter how serving ended.
        tracing::info!(target: "server", phase = %ServePhase::Stopped, "resources released");
        Ok(())
    }
}

async fn serve_connection(
    policy: &TrainedPolicy,
    mut stream: TcpStream,
) -> Result<ConnectionEnd, ChannelError> {
    loop {
        let envelope = match read_envelope(&mut stream).await {
            Ok(envelope) => envelope,
            Err(ChannelError::ConnectionClosed) => return Ok(ConnectionEnd::Disconnected),
            Err(e) => return Err(e),
        };
        channel_metrics().inc_messages(&envelope.label);
        if let Some(payload) = &envelope.payload {
            channel_metrics().observe_request_bytes(payload.len() as u64);
        }

        let reply = match Request::from_envelope(envelope) {
            Ok(Request::Shutdown) => return Ok(ConnectionEnd::ExitRequested),
            Ok(Request::Infer(obs)) => match policy.infer(&obs).await {
                Ok(result) => Reply::Actions(result),
                Err(e) => {
                    tracing::warn!(target: "server", error = %e, "inference call failed");
                    Reply::Failure(e.to_string())
                }
            },
            // A request this end cannot even decode still gets an answer;
            // the stream itself is intact, so the alternation continues.
            Err(e @ ChannelError::Codec(_)) | Err(e @ ChannelError::UnexpectedLabel(_)) => {
                tracing::warn!(target: "server", error = %e, "malformed request");
                Reply::Failure(e.to_string())
            }
            Err(e) => return Err(e),
        };

        write_envelope(&mut stream, &reply.to_envelope()?).await?;
    }
}
