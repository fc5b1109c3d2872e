//! Idempotent Homebrew primitives (check + apply pattern).
pub mod bundle;
pub mod package;
pub mod tap;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
///
/// Resources with no cheap state query (taps, bundle files) implement only
/// this trait; [`Resource`] adds the state check.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// The command [`apply`](Self::apply) would run, for dry-run output.
    fn command(&self) -> String;

    /// Apply the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `brew` command fails.
    fn apply(&self) -> Result<()>;
}

/// Presence of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource is not present.
    Missing,
    /// Resource is present; nothing to do.
    Correct,
}

/// Resources that can determine their own state before being applied.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    fn current_state(&self) -> ResourceState;

    /// Whether [`apply`](Applicable::apply) is needed.
    fn needs_change(&self) -> bool {
        self.current_state() == ResourceState::Missing
    }
}
