//! Formula and cask installation resource.
use std::fmt;

use anyhow::Result;

use super::{Applicable, Resource, ResourceState};
use crate::brew::Brew;

/// Kind of installable package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// Command-line package (`brew install <name>`).
    Formula,
    /// GUI application (`brew install --cask <name>`).
    Cask,
}

impl PackageKind {
    /// Extra flag selecting this kind on the `brew` command line.
    const fn flag(self) -> Option<&'static str> {
        match self {
            Self::Formula => None,
            Self::Cask => Some("--cask"),
        }
    }

    /// Plural noun used in summary messages.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Formula => "formulae",
            Self::Cask => "casks",
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Formula => write!(f, "formula"),
            Self::Cask => write!(f, "cask"),
        }
    }
}

/// A formula or cask that can be checked and installed.
#[derive(Debug)]
pub struct PackageResource<'a> {
    /// Package name as passed to `brew`.
    pub name: String,
    /// Formula or cask.
    pub kind: PackageKind,
    brew: &'a Brew,
}

impl<'a> PackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub const fn new(name: String, kind: PackageKind, brew: &'a Brew) -> Self {
        Self { name, kind, brew }
    }

    /// Arguments for `brew <subcommand> [--cask] <name>`.
    fn args<'s>(&'s self, subcommand: &'s [&'s str]) -> Vec<&'s str> {
        subcommand
            .iter()
            .copied()
            .chain(self.kind.flag())
            .chain(std::iter::once(self.name.as_str()))
            .collect()
    }
}

impl Applicable for PackageResource<'_> {
    fn description(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }

    fn command(&self) -> String {
        format!("brew {}", self.args(&["install"]).join(" "))
    }

    fn apply(&self) -> Result<()> {
        self.brew.run(&self.args(&["install"]))?;
        Ok(())
    }
}

impl Resource for PackageResource<'_> {
    /// `brew ls --versions` exits non-zero when the package is not installed.
    fn current_state(&self) -> ResourceState {
        match self.brew.run(&self.args(&["ls", "--versions"])) {
            Ok(_) => ResourceState::Correct,
            Err(_) => ResourceState::Missing,
        }
    }
}
