//! Subcommand orchestration.
pub mod directives;
pub mod install;
pub mod version;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::DotbrewError;
use crate::platform::Platform;

/// Configuration file looked up in the base directory when `--config` is
/// not given.
pub const DEFAULT_CONFIG: &str = "brew.toml";

/// Resolve the directory `brew` runs in: `--base-dir`, else the current
/// directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read or the
/// resolved path is not a directory.
pub fn resolve_base_dir(global: &GlobalOpts) -> Result<PathBuf> {
    let base_dir = match &global.base_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("reading the current directory")?,
    };
    if !base_dir.is_dir() {
        anyhow::bail!("base directory {} does not exist", base_dir.display());
    }
    Ok(base_dir)
}

/// Resolve the configuration file: `--config`, else [`DEFAULT_CONFIG`] in
/// `base_dir`. Relative `--config` paths are taken as given.
#[must_use]
pub fn resolve_config_path(global: &GlobalOpts, base_dir: &Path) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(|| base_dir.join(DEFAULT_CONFIG))
}

/// Detect the host platform once, for sharing with every component.
///
/// # Errors
///
/// Returns [`DotbrewError::Platform`] on an operating system Homebrew does
/// not support.
pub fn detect_platform() -> Result<Arc<Platform>, DotbrewError> {
    Ok(Arc::new(Platform::detect()?))
}

/// Load the configuration selected by `global`.
///
/// # Errors
///
/// Returns [`DotbrewError::Config`] if the file is missing or malformed.
pub fn load_config(global: &GlobalOpts, base_dir: &Path) -> Result<Config, DotbrewError> {
    Ok(Config::load(&resolve_config_path(global, base_dir))?)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn global(base_dir: Option<&Path>, config: Option<&Path>) -> GlobalOpts {
        GlobalOpts {
            dry_run: false,
            config: config.map(Path::to_path_buf),
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    #[test]
    fn resolve_base_dir_uses_explicit_dir() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_base_dir(&global(Some(dir.path()), None)).unwrap();
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn resolve_base_dir_rejects_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = resolve_base_dir(&global(Some(&missing), None)).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn config_defaults_to_base_dir() {
        let path = resolve_config_path(&global(None, None), Path::new("/dots"));
        assert_eq!(path, Path::new("/dots/brew.toml"));
    }

    #[test]
    fn load_config_reads_default_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG),
            "[[directive]]\ntap = [\"a/b\"]\n",
        )
        .unwrap();
        let config = load_config(&global(None, None), dir.path()).unwrap();
        assert_eq!(config.blocks.len(), 1);
    }

    #[test]
    fn load_config_errors_are_typed() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&global(None, None), dir.path()).unwrap_err();
        assert!(matches!(
            err,
            DotbrewError::Config(crate::error::ConfigError::NotFound(_))
        ));
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    #[test]
    fn detect_platform_on_supported_host() {
        let platform = detect_platform().unwrap();
        assert!(platform.homebrew_prefix().starts_with('/'));
    }

    #[test]
    fn config_override_wins() {
        let path = resolve_config_path(
            &global(None, Some(Path::new("/etc/brew.toml"))),
            Path::new("/dots"),
        );
        assert_eq!(path, Path::new("/etc/brew.toml"));
    }
}
