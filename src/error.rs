//! Domain-specific error types.
//!
//! Internal modules return typed errors (e.g., [`DirectiveError`],
//! [`ConfigError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DotbrewError
//! ├── Directive(DirectiveError): unsupported directive names
//! ├── Config(ConfigError): reading and parsing the TOML config
//! └── Platform(PlatformError): unsupported operating systems
//! ```
//!
//! Failing `brew` invocations have no variant here: they are logged and
//! reported as a `false` directive result, never raised.

use std::path::PathBuf;

use thiserror::Error;

use crate::platform::Os;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum DotbrewError {
    /// A directive could not be handled.
    #[error("Directive error: {0}")]
    Directive(#[from] DirectiveError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The host platform is not supported.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Errors raised by the directive processor.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DirectiveError {
    /// The directive is unknown, or not available on this platform.
    #[error("Brew cannot handle directive {directive} on {platform}")]
    Unsupported {
        /// Directive name as written in the configuration.
        directive: String,
        /// Platform the directive was rejected on.
        platform: Os,
    },
}

/// Errors that arise from loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// An I/O error occurred while reading the config file.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the expected shape.
    #[error("Invalid TOML in {}: {message}", .path.display())]
    InvalidSyntax {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A `[[directive]]` table does not hold exactly one directive.
    #[error("Directive block #{index} must contain exactly one directive, found {found}")]
    InvalidBlock {
        /// One-based position of the block in the file.
        index: usize,
        /// Number of keys found in the block.
        found: usize,
    },
}

/// Errors that arise from platform detection.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlatformError {
    /// The current operating system is not supported by Homebrew.
    #[error("Operation not supported on {platform}")]
    Unsupported {
        /// Name of the platform (e.g., `"windows"`).
        platform: String,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn directive_error_unsupported_display() {
        let e = DirectiveError::Unsupported {
            directive: "cask".to_string(),
            platform: Os::Linux,
        };
        assert_eq!(e.to_string(), "Brew cannot handle directive cask on linux");
    }

    #[test]
    fn config_error_not_found_display() {
        let e = ConfigError::NotFound(PathBuf::from("/dots/brew.toml"));
        assert_eq!(e.to_string(), "Config file not found: /dots/brew.toml");
    }

    #[test]
    fn config_error_io_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::Io {
            path: PathBuf::from("/dots/brew.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.to_string().contains("/dots/brew.toml"));
        assert!(e.source().is_some());
    }

    #[test]
    fn config_error_invalid_block_display() {
        let e = ConfigError::InvalidBlock { index: 3, found: 2 };
        assert_eq!(
            e.to_string(),
            "Directive block #3 must contain exactly one directive, found 2"
        );
    }

    #[test]
    fn dotbrew_error_wraps_sub_errors() {
        let e: DotbrewError = PlatformError::Unsupported {
            platform: "freebsd".to_string(),
        }
        .into();
        assert!(e.to_string().starts_with("Platform error"));

        let e: DotbrewError = ConfigError::InvalidBlock { index: 1, found: 0 }.into();
        assert!(e.to_string().starts_with("Configuration error"));

        let e: DotbrewError = DirectiveError::Unsupported {
            directive: "pip".to_string(),
            platform: Os::MacOs,
        }
        .into();
        assert!(e.to_string().contains("pip"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<DotbrewError>();
        assert_send_sync::<DirectiveError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<PlatformError>();
    }

    #[test]
    fn directive_error_converts_to_anyhow() {
        let e = DirectiveError::Unsupported {
            directive: "x".to_string(),
            platform: Os::Linux,
        };
        let _anyhow_err: anyhow::Error = e.into();
    }
}
