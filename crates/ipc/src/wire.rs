// Path: crates/ipc/src/wire.rs

//! Typed requests and replies layered over the raw envelope.

use crate::{Envelope, LABEL_ERROR, LABEL_EXAMPLE, LABEL_EXIT, LABEL_RESULT};
use pilot_types::codec;
use pilot_types::error::ChannelError;
use pilot_types::{ActionResult, RawObservation};

/// A message from the robot-side caller to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Run inference on one observation.
    Infer(RawObservation),
    /// Stop the server. No reply follows.
    Shutdown,
}

impl Request {
    /// Serializes the request into its wire envelope.
    pub fn to_envelope(&self) -> Result<Envelope, ChannelError> {
        match self {
            Request::Infer(obs) => {
                let payload = codec::to_wire_bytes(obs).map_err(ChannelError::Codec)?;
                Ok(Envelope::with_payload(LABEL_EXAMPLE, payload))
            }
            Request::Shutdown => Ok(Envelope::bare(LABEL_EXIT)),
        }
    }

    /// Decodes a request from a received envelope.
    pub fn from_envelope(envelope: Envelope) -> Result<Self, ChannelError> {
        match envelope.label.as_str() {
            LABEL_EXAMPLE => {
                let payload = envelope.payload.ok_or_else(|| {
                    ChannelError::Codec("example request is missing its payload frame".into())
                })?;
                let obs = codec::from_wire_bytes(&payload).map_err(ChannelError::Codec)?;
                Ok(Request::Infer(obs))
            }
            LABEL_EXIT => Ok(Request::Shutdown),
            other => Err(ChannelError::UnexpectedLabel(other.to_string())),
        }
    }
}

/// A message from the server back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Inference succeeded; the truncated action chunk.
    Actions(ActionResult),
    /// The call failed; the server stays up and the caller decides what to
    /// do with the message.
    Failure(String),
}

impl Reply {
    /// Serializes the reply into its wire envelope.
    pub fn to_envelope(&self) -> Result<Envelope, ChannelError> {
        match self {
            Reply::Actions(result) => {
                let payload = codec::to_wire_bytes(result).map_err(ChannelError::Codec)?;
                Ok(Envelope::with_payload(LABEL_RESULT, payload))
            }
            Reply::Failure(message) => {
                let payload = codec::to_wire_bytes(message).map_err(ChannelError::Codec)?;
                Ok(Envelope::with_payload(LABEL_ERROR, payload))
            }
        }
    }

    /// Decodes a reply from a received envelope.
    pub fn from_envelope(envelope: Envelope) -> Result<Self, ChannelError> {
        let payload = envelope
            .payload
            .ok_or_else(|| ChannelError::Codec("reply is missing its payload frame".into()))?;
        match envelope.label.as_str() {
            LABEL_RESULT => {
                let result = codec::from_wire_bytes(&payload).map_err(ChannelError::Codec)?;
                Ok(Reply::Actions(result))
            }
            LABEL_ERROR => {
                let message = codec::from_wire_bytes(&payload).map_err(ChannelError::Codec)?;
                Ok(Reply::Failure(message))
            }
            other => Err(ChannelError::UnexpectedLabel(other.to_string())),
        }
    }
}
