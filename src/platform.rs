//! Platform detection and the Homebrew layout it implies.
use std::fmt;

use crate::error::PlatformError;

/// Detected operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Apple macOS.
    MacOs,
    /// Linux (Homebrew on Linux).
    Linux,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macos"),
            Self::Linux => write!(f, "linux"),
        }
    }
}

/// CPU architecture, as far as it affects the Homebrew prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    /// 64-bit ARM (Apple silicon on macOS).
    Aarch64,
    /// Anything else (`x86_64` in practice).
    Other,
}

/// Platform information for the current system.
///
/// Built once at startup with [`Platform::detect`] and shared immutably
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Detect the current platform.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] when running on an operating
    /// system Homebrew does not support.
    pub fn detect() -> Result<Self, PlatformError> {
        Self::from_identifiers(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Build a platform from Rust's OS and architecture identifiers
    /// (`std::env::consts::OS` / `ARCH`).
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] for an unknown OS identifier.
    pub fn from_identifiers(os: &str, arch: &str) -> Result<Self, PlatformError> {
        let os = match os {
            "macos" => Os::MacOs,
            "linux" => Os::Linux,
            other => {
                return Err(PlatformError::Unsupported {
                    platform: other.to_string(),
                });
            }
        };
        let arch = match arch {
            "aarch64" | "arm64" => Arch::Aarch64,
            _ => Arch::Other,
        };
        Ok(Self { os, arch })
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Whether this is macOS.
    #[must_use]
    pub fn is_macos(&self) -> bool {
        self.os == Os::MacOs
    }

    /// Whether casks can be installed here (macOS only).
    #[must_use]
    pub fn supports_casks(&self) -> bool {
        self.is_macos()
    }

    /// Default Homebrew installation prefix.
    ///
    /// See <https://docs.brew.sh/Installation>.
    #[must_use]
    pub const fn homebrew_prefix(&self) -> &'static str {
        match (self.os, self.arch) {
            (Os::MacOs, Arch::Aarch64) => "/opt/homebrew",
            (Os::MacOs, Arch::Other) => "/usr/local",
            (Os::Linux, _) => "/home/linuxbrew/.linuxbrew",
        }
    }
}
