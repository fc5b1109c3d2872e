//! Third-party repository (tap) resource.
use anyhow::Result;

use super::Applicable;
use crate::brew::Brew;

/// Tap required on macOS before casks can be resolved.
pub const CASK_TAP: &str = "homebrew/cask";

/// A tap to register with `brew tap`.
///
/// `brew tap` is itself idempotent, so there is no separate state check.
#[derive(Debug)]
pub struct TapResource<'a> {
    /// Tap name (`user/repo`).
    pub name: String,
    brew: &'a Brew,
}

impl<'a> TapResource<'a> {
    /// Create a new tap resource.
    #[must_use]
    pub const fn new(name: String, brew: &'a Brew) -> Self {
        Self { name, brew }
    }
}

impl Applicable for TapResource<'_> {
    fn description(&self) -> String {
        format!("{} (tap)", self.name)
    }

    fn command(&self) -> String {
        format!("brew tap {}", self.name)
    }

    fn apply(&self) -> Result<()> {
        self.brew.run(&["tap", &self.name])?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;
    use crate::brew::ShellEnv;
    use crate::exec::Executor;
    use crate::logging::Log;
    use crate::logging::test_helpers::RecordingLog;
    use crate::resources::test_helpers::MockExecutor;

    #[test]
    fn apply_runs_brew_tap() {
        let executor = Arc::new(MockExecutor::new().failing("brew tap bad/tap"));
        let brew = Brew::new(
            Arc::clone(&executor) as Arc<dyn Executor>,
            ShellEnv::with_lookup("/usr/local", |_| None),
            PathBuf::from("/dots"),
            Arc::new(RecordingLog::default()) as Arc<dyn Log>,
        );

        let good = TapResource::new("homebrew/cask-fonts".to_string(), &brew);
        assert_eq!(good.description(), "homebrew/cask-fonts (tap)");
        assert_eq!(good.command(), "brew tap homebrew/cask-fonts");
        good.apply().unwrap();

        let bad = TapResource::new("bad/tap".to_string(), &brew);
        assert!(bad.apply().is_err());

        assert_eq!(
            executor.commands(),
            vec!["brew tap homebrew/cask-fonts", "brew tap bad/tap"]
        );
    }
}
