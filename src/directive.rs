//! The closed set of configuration directives.
use std::fmt;

use crate::platform::Platform;

/// A named configuration block requesting one kind of Homebrew operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// `brew tap <name>` for each entry.
    Tap,
    /// `brew install <formula>` for each entry.
    Brew,
    /// `brew install --cask <cask>` for each entry (macOS only).
    Cask,
    /// `brew bundle --file=<path>` for each entry.
    Brewfile,
}

impl Directive {
    /// Every directive, in the order they are listed to users.
    pub const ALL: [Self; 4] = [Self::Tap, Self::Brew, Self::Cask, Self::Brewfile];

    /// Configuration key for this directive.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::Brew => "brew",
            Self::Cask => "cask",
            Self::Brewfile => "brewfile",
        }
    }

    /// Parse a configuration key. Matching is exact.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    /// Whether this directive can run on `platform`.
    #[must_use]
    pub fn is_supported_on(self, platform: &Platform) -> bool {
        match self {
            Self::Tap | Self::Brew | Self::Brewfile => true,
            Self::Cask => platform.supports_casks(),
        }
    }

    /// Directives available on `platform`.
    #[must_use]
    pub fn supported_on(platform: &Platform) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|d| d.is_supported_on(platform))
            .collect()
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
