// Path: crates/policy/src/config.rs

//! The named policy profile registry.
//!
//! A server is started with a policy configuration identifier. Known
//! identifiers resolve to built-in profiles; anything else is tried as a
//! path to a TOML profile on disk, so a new robot can be served without
//! recompiling.

use pilot_types::config::{ModelVariant, PolicyConfig};
use pilot_types::error::PolicyError;
use std::path::Path;

/// Degrees of freedom of the dual-arm robot the built-in profiles target
/// (two 7-DOF arms plus two gripper channels).
pub const DUAL_ARM_DOF: usize = 16;

/// Resolves a policy configuration identifier to a full profile.
pub fn get_config(name: &str) -> Result<PolicyConfig, PolicyError> {
    match name {
        "dualarm_base" => Ok(PolicyConfig {
            name: name.to_string(),
            variant: ModelVariant::Base,
            action_dim: 32,
            action_horizon: 50,
            robot_dof: DUAL_ARM_DOF,
        }),
        "dualarm_fast" => Ok(PolicyConfig {
            name: name.to_string(),
            variant: ModelVariant::Fast,
            action_dim: 32,
            action_horizon: 50,
            robot_dof: DUAL_ARM_DOF,
        }),
        other => read_profile_file(other),
    }
}

fn read_profile_file(path: &str) -> Result<PolicyConfig, PolicyError> {
    if !Path::new(path).is_file() {
        return Err(PolicyError::Config(format!(
            "unknown policy configuration '{}' (not a built-in profile or a TOML file)",
            path
        )));
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| PolicyError::Config(format!("failed to read profile '{}': {}", path, e)))?;
    toml::from_str(&raw)
        .map_err(|e| PolicyError::Config(format!("failed to parse profile '{}': {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_profiles_resolve() {
        let base = get_config("dualarm_base").unwrap();
        assert_eq!(base.variant, ModelVariant::Base);
        assert_eq!(base.action_dim, 32);
        assert_eq!(base.robot_dof, 16);

        let fast = get_config("dualarm_fast").unwrap();
        assert_eq!(fast.variant, ModelVariant::Fast);
    }

    #[test]
    fn unknown_identifier_fails() {
        let err = get_config("no_such_profile").unwrap_err();
        assert!(matches!(err, PolicyError::Config(_)));
    }

    #[test]
    fn toml_profile_file_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("singlearm.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            r#"
            name = "singlearm"
            variant = "pi0-fast"
            action_dim = 32
            action_horizon = 10
            robot_dof = 7
            "#
        )
        .unwrap();
        let profile = get_config(path.to_str().unwrap()).unwrap();
        assert_eq!(profile.variant, ModelVariant::Fast);
        assert_eq!(profile.robot_dof, 7);
        assert_eq!(profile.action_horizon, 10);
    }
}
