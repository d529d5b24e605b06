// Path: crates/types/src/error.rs
//! Core error types for the Pilot policy server.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised while mapping observations and actions between the robot's
/// native format and the model's canonical layout.
///
/// These are local to a single inference call and never corrupt server
/// state; the server answers the offending request with an error reply and
/// keeps serving.
#[derive(Error, Debug)]
pub enum TransformError {
    /// The configured model variant is not one this transform understands.
    #[error("Unsupported model variant: {0}")]
    UnsupportedVariant(String),
    /// A state or action vector was longer than the padding target.
    #[error("Vector of length {got} exceeds the padding target {limit}")]
    DimensionOverflow {
        /// The configured padding target (the model's action dimension).
        limit: usize,
        /// The length actually supplied.
        got: usize,
    },
    /// The output transform was asked to keep more columns than exist.
    #[error("Cannot keep {requested} action columns, only {available} present")]
    TruncationOutOfRange {
        /// Columns the robot profile asked to keep.
        requested: usize,
        /// Columns the action matrix actually has.
        available: usize,
    },
    /// A byte prompt was not valid UTF-8.
    #[error("Prompt bytes are not valid UTF-8: {0}")]
    InvalidPrompt(String),
}

impl ErrorCode for TransformError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedVariant(_) => "TRANSFORM_UNSUPPORTED_VARIANT",
            Self::DimensionOverflow { .. } => "TRANSFORM_DIMENSION_OVERFLOW",
            Self::TruncationOutOfRange { .. } => "TRANSFORM_TRUNCATION_OUT_OF_RANGE",
            Self::InvalidPrompt(_) => "TRANSFORM_INVALID_PROMPT",
        }
    }
}

/// Errors raised on the request/reply channel between robot and server.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The underlying socket failed.
    #[error("Channel I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// A payload could not be encoded or decoded.
    #[error("Wire codec error: {0}")]
    Codec(String),
    /// A frame announced a length beyond the permitted bound.
    #[error("Frame of {got} bytes exceeds the {limit} byte limit")]
    FrameTooLarge {
        /// The configured per-frame byte limit.
        limit: usize,
        /// The length the peer announced.
        got: usize,
    },
    /// The peer sent a label this end does not understand.
    #[error("Unexpected message label: {0:?}")]
    UnexpectedLabel(String),
    /// The peer closed the connection mid-exchange.
    #[error("Connection closed by peer")]
    ConnectionClosed,
    /// The server answered with an error reply instead of a result.
    #[error("Remote inference failed: {0}")]
    Remote(String),
}

impl ErrorCode for ChannelError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "CHANNEL_IO",
            Self::Codec(_) => "CHANNEL_CODEC",
            Self::FrameTooLarge { .. } => "CHANNEL_FRAME_TOO_LARGE",
            Self::UnexpectedLabel(_) => "CHANNEL_UNEXPECTED_LABEL",
            Self::ConnectionClosed => "CHANNEL_CLOSED",
            Self::Remote(_) => "CHANNEL_REMOTE",
        }
    }
}

/// Errors raised while loading or running a policy.
///
/// Load-time variants (`CheckpointNotFound`, `DownloadFailed`, `ModelLoad`,
/// `Config`) are fatal at startup: the server never starts listening.
/// `Inference` and `Transform` are per-call failures.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// The checkpoint location did not resolve to existing weights.
    #[error("Checkpoint not found: {0}")]
    CheckpointNotFound(String),
    /// Remote checkpoint retrieval failed.
    #[error("Checkpoint download failed: {0}")]
    DownloadFailed(String),
    /// The checkpoint exists but could not be loaded as a model.
    #[error("Model load failed: {0}")]
    ModelLoad(String),
    /// The policy configuration identifier could not be resolved.
    #[error("Policy configuration error: {0}")]
    Config(String),
    /// The model rejected or failed on a canonical input.
    #[error("Inference failed: {0}")]
    Inference(String),
    /// An observation or action failed to map to the canonical layout.
    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl ErrorCode for PolicyError {
    fn code(&self) -> &'static str {
        match self {
            Self::CheckpointNotFound(_) => "POLICY_CHECKPOINT_NOT_FOUND",
            Self::DownloadFailed(_) => "POLICY_DOWNLOAD_FAILED",
            Self::ModelLoad(_) => "POLICY_MODEL_LOAD",
            Self::Config(_) => "POLICY_CONFIG",
            Self::Inference(_) => "POLICY_INFERENCE",
            Self::Transform(e) => e.code(),
        }
    }
}
