// Path: crates/policy/src/checkpoint.rs

//! Resolves a checkpoint location to a local directory.
//!
//! A location is either a local directory (used as-is) or an `http(s)://`
//! base URL. Remote checkpoints are fetched once into a local cache and
//! reused on later startups. Resolution is a blocking call made exactly
//! once, before the server starts listening.

use pilot_types::error::PolicyError;
use std::io;
use std::path::{Path, PathBuf};

/// The files that make up one checkpoint directory.
pub const CHECKPOINT_FILES: [&str; 2] = ["metadata.json", "weights.bin"];

/// Environment variable overriding the download cache root.
pub const CACHE_ENV: &str = "PILOT_CHECKPOINT_CACHE";

/// Resolves `location` to a local checkpoint directory.
///
/// - An existing local directory is returned unchanged.
/// - An `http(s)://` location is mapped into the cache; when the cached
///   copy is incomplete it is fetched, but only if `download_if_missing`
///   is set; otherwise resolution fails with `CheckpointNotFound`.
/// - Anything else fails with `CheckpointNotFound`.
pub fn resolve(location: &str, download_if_missing: bool) -> Result<PathBuf, PolicyError> {
    if is_remote(location) {
        let target = cache_dir_for(location);
        if is_complete(&target) {
            return Ok(target);
        }
        if !download_if_missing {
            return Err(PolicyError::CheckpointNotFound(format!(
                "{} (not cached; pass --download-if-missing to fetch it)",
                location
            )));
        }
        download_checkpoint(location, &target)?;
        return Ok(target);
    }

    let path = Path::new(location);
    if path.is_dir() {
        return Ok(path.to_path_buf());
    }
    Err(PolicyError::CheckpointNotFound(location.to_string()))
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

fn is_complete(dir: &Path) -> bool {
    CHECKPOINT_FILES.iter().all(|f| dir.join(f).is_file())
}

fn cache_root() -> PathBuf {
    if let Ok(dir) = std::env::var(CACHE_ENV) {
        return PathBuf::from(dir);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".cache").join("pilot");
    }
    std::env::temp_dir().join("pilot-checkpoints")
}

/// One cache directory per URL; the sanitized URL doubles as the directory
/// name so cached checkpoints are inspectable by eye.
fn cache_dir_for(url: &str) -> PathBuf {
    let sanitized: String = url
        .trim_end_matches('/')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    cache_root().join(sanitized)
}

fn download_checkpoint(base_url: &str, target: &Path) -> Result<(), PolicyError> {
    std::fs::create_dir_all(target)
        .map_err(|e| PolicyError::DownloadFailed(format!("cannot create cache dir: {}", e)))?;
    let base = base_url.trim_end_matches('/');
    for file in CHECKPOINT_FILES {
        let url = format!("{}/{}", base, file);
        tracing::info!(target: "checkpoint", url = %url, "fetching");
        let response = ureq::get(&url)
            .call()
            .map_err(|e| PolicyError::DownloadFailed(format!("GET {} failed: {}", url, e)))?;
        let dest = target.join(file);
        let mut out = std::fs::File::create(&dest).map_err(|e| {
            PolicyError::DownloadFailed(format!("cannot write {}: {}", dest.display(), e))
        })?;
        io::copy(&mut response.into_reader(), &mut out).map_err(|e| {
            PolicyError::DownloadFailed(format!("transfer of {} failed: {}", url, e))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_directory_resolves_to_itself() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve(dir.path().to_str().unwrap(), false).unwrap();
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn missing_local_path_is_not_found() {
        let err = resolve("/no/such/checkpoint", false).unwrap_err();
        assert!(matches!(err, PolicyError::CheckpointNotFound(_)));
    }

    #[test]
    fn remote_without_download_flag_is_not_found() {
        let cache = tempfile::tempdir().unwrap();
        std::env::set_var(CACHE_ENV, cache.path());
        let err = resolve("https://ckpt.example.com/dualarm/249", false).unwrap_err();
        std::env::remove_var(CACHE_ENV);
        assert!(matches!(err, PolicyError::CheckpointNotFound(_)));
    }

    #[test]
    fn cache_dir_name_is_sanitized() {
        let dir = cache_dir_for("https://ckpt.example.com/dualarm/249/");
        let name = dir.file_name().unwrap().to_str().unwrap();
        assert_eq!(name, "https___ckpt_example_com_dualarm_249");
    }
}
