// Path: crates/client/src/policy_client.rs

use pilot_ipc::wire::{Reply, Request};
use pilot_ipc::{read_envelope, write_envelope};
use pilot_types::error::ChannelError;
use pilot_types::{ActionResult, RawObservation};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// A client for the inference channel.
///
/// The protocol is strict alternation: every [`PolicyClient::infer`] call
/// sends exactly one request and then blocks until exactly one reply
/// arrives. There is no timeout and no retry at this layer: a server that
/// never replies stalls the caller indefinitely, which is the intended
/// contract for a single-robot control loop. Retries, if desired, belong to
/// the caller.
pub struct PolicyClient {
    stream: TcpStream,
    addr: String,
}

impl std::fmt::Debug for PolicyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyClient")
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}

impl PolicyClient {
    /// Establishes a connection to the policy server.
    pub async fn connect(addr: &str) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect(addr).await?;
        log::info!("PolicyClient connected to {}", addr);
        Ok(Self {
            stream,
            addr: addr.to_string(),
        })
    }

    /// The address this client is connected to.
    pub fn destination_addr(&self) -> &str {
        &self.addr
    }

    /// Sends one observation and blocks until the action chunk arrives.
    ///
    /// A server-side per-call failure comes back as
    /// [`ChannelError::Remote`] carrying the server's message; transport
    /// and codec failures keep their own variants so a caller can tell the
    /// infrastructure failing apart from the logic rejecting its input.
    pub async fn infer(&mut self, obs: &RawObservation) -> Result<ActionResult, ChannelError> {
        let envelope = Request::Infer(obs.clone()).to_envelope()?;
        write_envelope(&mut self.stream, &envelope).await?;

        let reply = Reply::from_envelope(read_envelope(&mut self.stream).await?)?;
        match reply {
            Reply::Actions(result) => Ok(result),
            Reply::Failure(message) => {
                log::warn!("server rejected inference call: {}", message);
                Err(ChannelError::Remote(message))
            }
        }
    }

    /// Asks the server to stop and closes the connection.
    ///
    /// `exit` gets no reply by protocol; the write side is shut down to
    /// signal EOF and the connection is dropped.
    pub async fn shutdown(mut self) -> Result<(), ChannelError> {
        let envelope = Request::Shutdown.to_envelope()?;
        write_envelope(&mut self.stream, &envelope).await?;
        self.stream.shutdown().await?;
        log::info!("PolicyClient sent exit to {}", self.addr);
        Ok(())
    }
}
