// Path: crates/types/src/config.rs

//! Shared configuration structures for the Pilot policy server.

use crate::error::TransformError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn default_action_dim() -> usize {
    32
}
fn default_action_horizon() -> usize {
    50
}

/// Selects which canonical camera-slot layout and masking rule applies.
///
/// Fixed at transform construction time, not per call. The slot tables
/// themselves live in `pilot-transforms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVariant {
    /// The base diffusion-head model family.
    #[serde(rename = "pi0")]
    Base,
    /// The FAST autoregressive model family. Padding image slots are not
    /// masked out for this variant.
    #[serde(rename = "pi0-fast")]
    Fast,
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelVariant::Base => write!(f, "pi0"),
            ModelVariant::Fast => write!(f, "pi0-fast"),
        }
    }
}

impl FromStr for ModelVariant {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pi0" => Ok(ModelVariant::Base),
            "pi0-fast" | "pi0_fast" => Ok(ModelVariant::Fast),
            other => Err(TransformError::UnsupportedVariant(other.to_string())),
        }
    }
}

/// One named policy profile: which model variant is served and how the
/// robot's action space maps onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Profile identifier, e.g. `dualarm_base`.
    pub name: String,
    /// Which model variant the checkpoint was trained for.
    pub variant: ModelVariant,
    /// The model's fixed action dimensionality; states and training actions
    /// are zero-padded up to this width.
    #[serde(default = "default_action_dim")]
    pub action_dim: usize,
    /// Number of future time-steps in one predicted action chunk.
    #[serde(default = "default_action_horizon")]
    pub action_horizon: usize,
    /// The robot's real degree-of-freedom count; model output is truncated
    /// to this many columns before leaving the server.
    pub robot_dof: usize,
}

/// Startup configuration for the inference server process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind, e.g. `0.0.0.0`.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Policy configuration identifier resolved by the profile registry.
    pub config_name: String,
    /// Checkpoint location: a local directory or an `http(s)://` URL.
    pub checkpoint: String,
    /// Fetch the checkpoint into the local cache when it is missing.
    #[serde(default)]
    pub download_if_missing: bool,
}

impl ServerConfig {
    /// The `host:port` string this server binds.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parses_known_names() {
        assert_eq!("pi0".parse::<ModelVariant>().unwrap(), ModelVariant::Base);
        assert_eq!(
            "pi0-fast".parse::<ModelVariant>().unwrap(),
            ModelVariant::Fast
        );
        assert_eq!(
            "pi0_fast".parse::<ModelVariant>().unwrap(),
            ModelVariant::Fast
        );
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let err = "pi3".parse::<ModelVariant>().unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedVariant(ref v) if v == "pi3"));
    }

    #[test]
    fn policy_profile_deserializes_from_toml_with_defaults() {
        let profile: PolicyConfig = toml::from_str(
            r#"
            name = "dualarm_base"
            variant = "pi0"
            robot_dof = 16
            "#,
        )
        .unwrap();
        assert_eq!(profile.variant, ModelVariant::Base);
        assert_eq!(profile.action_dim, 32);
        assert_eq!(profile.action_horizon, 50);
        assert_eq!(profile.robot_dof, 16);
    }

    #[test]
    fn variant_display_matches_serde_names() {
        for v in [ModelVariant::Base, ModelVariant::Fast] {
            let json = serde_json::to_string(&v).unwrap();
            assert_eq!(json, format!("\"{}\"", v));
        }
    }
}
