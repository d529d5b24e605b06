// Path: crates/ipc/src/lib.rs
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

//! # Pilot IPC
//!
//! The wire protocol of the inference channel: a multipart envelope whose
//! first frame is an ASCII label and whose optional second frame is an
//! opaque serialized payload. Each frame travels as a `u32` length prefix
//! followed by that many bytes; the envelope itself is prefixed with its
//! frame count.
//!
//! The payload codec lives in `pilot-types::codec` so that both ends of the
//! channel serialize identically by construction.

use pilot_types::error::ChannelError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// The typed request/reply layer above the raw envelope.
pub mod wire;


/// Request label carrying one serialized observation.
pub const LABEL_EXAMPLE: &str = "example";
/// Request label asking the server to stop. Carries no payload and gets no
/// reply.
pub const LABEL_EXIT: &str = "exit";
/// Reply label carrying one serialized action chunk.
pub const LABEL_RESULT: &str = "result";
/// Reply label carrying a per-call failure message.
pub const LABEL_ERROR: &str = "error";

/// Upper bound on a single frame. The length prefix is read before the
/// body, so a corrupt or hostile peer must not be able to make this end
/// allocate unbounded memory.
pub const MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

/// One logical message on the channel: a label frame plus an optional
/// payload frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// ASCII message label, e.g. `example` or `result`.
    pub label: String,
    /// Serialized payload, absent for labels like `exit`.
    pub payload: Option<Vec<u8>>,
}

impl Envelope {
    /// An envelope with a payload frame.
    pub fn with_payload(label: &str, payload: Vec<u8>) -> Self {
        Self {
            label: label.to_string(),
            payload: Some(payload),
        }
    }

    /// A label-only envelope.
    pub fn bare(label: &str) -> Self {
        Self {
            label: label.to_string(),
            payload: None,
        }
    }
}

async fn write_frame<W: AsyncWrite + Unpin>(w: &mut W, bytes: &[u8]) -> Result<(), ChannelError> {
    if bytes.len() > MAX_FRAME_BYTES {
        return Err(ChannelError::FrameTooLarge {
            limit: MAX_FRAME_BYTES,
            got: bytes.len(),
        });
    }
    w.write_u32(bytes.len() as u32).await?;
    w.write_all(bytes).await?;
    Ok(())
}

async fn read_frame<R: AsyncRead + Unpin>(r: &mut R) -> Result<Vec<u8>, ChannelError> {
    let len = r.read_u32().await? as usize;
    if len > MAX_FRAME_BYTES {
        return Err(ChannelError::FrameTooLarge {
            limit: MAX_FRAME_BYTES,
            got: len,
        });
    }
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf).await?;
    Ok(buf)
}

/// Writes one envelope and flushes the stream.
pub async fn write_envelope<W: AsyncWrite + Unpin>(
    w: &mut W,
    envelope: &Envelope,
) -> Result<(), ChannelError> {
    let frames: u8 = if envelope.payload.is_some() { 2 } else { 1 };
    w.write_u8(frames).await?;
    write_frame(w, envelope.label.as_bytes()).await?;
    if let Some(payload) = &envelope.payload {
        write_frame(w, payload).await?;
    }
    w.flush().await?;
    Ok(())
}

/// Reads one envelope, blocking until a complete message arrives.
///
/// A clean EOF before the first byte maps to [`ChannelError::ConnectionClosed`]
/// (the peer hung up between messages); an EOF mid-envelope stays an I/O
/// error because it means the message was cut short.
pub async fn read_envelope<R: AsyncRead + Unpin>(r: &mut R) -> Result<Envelope, ChannelError> {
    let frames = match r.read_u8().await {
        Ok(n) => n,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ChannelError::ConnectionClosed)
        }
        Err(e) => return Err(ChannelError::Io(e)),
    };
    if frames == 0 || frames > 2 {
        return Err(ChannelError::Codec(format!(
            "envelope announced {} frames, expected 1 or 2",
            frames
        )));
    }
    let label_bytes = read_frame(r).await?;
    let label = String::from_utf8(label_bytes)
        .map_err(|e| ChannelError::Codec(format!("label is not ASCII/UTF-8: {}", e)))?;
    let payload = if frames == 2 {
        Some(read_frame(r).await?)
    } else {
        None
    };
    Ok(Envelope { label, payload })
}
