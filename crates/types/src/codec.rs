// crates/types/src/codec.rs

//! Defines the wire codec shared by the inference client and server.
//!
//! This module provides simple wrappers around `bincode`. By centralizing the
//! codec logic here in the base `types` crate, we ensure that both ends of the
//! request/reply channel use the exact same serialization format for
//! observation and action payloads; the framing layer only ever sees opaque
//! byte blobs.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes a payload into its wire byte representation.
///
/// # Arguments
///
/// * `v` - A reference to a value that implements `serde::Serialize`.
///
/// # Returns
///
/// A `Vec<u8>` containing the bincode-encoded bytes, or a descriptive
/// `String` on failure. Callers map the error into their own taxonomy
/// (typically `ChannelError::Codec`).
pub fn to_wire_bytes<T: Serialize>(v: &T) -> Result<Vec<u8>, String> {
    bincode::serialize(v).map_err(|e| format!("wire encode failed: {}", e))
}

/// Decodes a payload from its wire byte representation.
///
/// Fails fast on any decoding error so a malformed request is rejected as a
/// whole rather than partially interpreted.
pub fn from_wire_bytes<T: DeserializeOwned>(b: &[u8]) -> Result<T, String> {
    bincode::deserialize(b).map_err(|e| format!("wire decode failed: {}", e))
}
