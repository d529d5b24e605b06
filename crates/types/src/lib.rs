// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Pilot Types
//!
//! This crate is the foundational library for the Pilot policy server,
//! containing all core data structures, error types, and configuration
//! objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `pilot-types` has minimal dependencies and is itself a
//! dependency for almost every other crate in the workspace. This structure
//! prevents circular dependencies and provides a stable, canonical definition
//! for shared types like `RawObservation`, `CanonicalInput`, `ActionResult`,
//! and the error enums. Both ends of the inference channel serialize through
//! this crate, which is what keeps the wire codec symmetric.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::PolicyError> = std::result::Result<T, E>;

/// The wire codec shared by the inference client and server.
pub mod codec;
/// Shared configuration structures (`PolicyConfig`, `ServerConfig`) and the
/// model-variant tag.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Observation and action data structures exchanged with the policy.
pub mod obs;

pub use config::ModelVariant;
pub use error::ErrorCode;
pub use obs::{ActionResult, CanonicalInput, ImageFrame, Prompt, RawObservation};
