// Path: crates/policy/src/lib.rs
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

//! # Pilot Policy
//!
//! Turns a checkpoint on disk into a servable policy: a named configuration
//! profile selects the model variant and action-space mapping, the
//! checkpoint resolver produces a local weights directory (optionally
//! fetching it over HTTP), and `create_trained_policy` wires the input
//! transform, the model backend, and the output transform into one
//! observation-in, action-out pipeline.
//!
//! The model itself stays behind the [`model::PolicyModel`] trait; nothing
//! above that seam knows what kind of network (or test double) is answering.

/// Checkpoint location resolution and the local download cache.
pub mod checkpoint;
/// The named policy profile registry.
pub mod config;
/// The reference linear read-out backend.
pub mod linear;
/// The `PolicyModel` seam and the checkpoint-driven model loader.
pub mod model;
/// The assembled transform/model/transform pipeline.
pub mod trained;

pub use config::get_config;
pub use model::PolicyModel;
pub use trained::{create_trained_policy, TrainedPolicy};
