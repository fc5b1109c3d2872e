//! Bundle file (`Brewfile`) resource.
use anyhow::Result;

use super::Applicable;
use crate::brew::Brew;

/// A bundle file installed with `brew bundle --file=<path>`.
///
/// Relative paths resolve against the base directory, which is the working
/// directory of every `brew` invocation.
#[derive(Debug)]
pub struct BundleResource<'a> {
    /// Path to the bundle file, as configured.
    pub path: String,
    brew: &'a Brew,
}

impl<'a> BundleResource<'a> {
    /// Create a new bundle resource.
    #[must_use]
    pub const fn new(path: String, brew: &'a Brew) -> Self {
        Self { path, brew }
    }

    fn file_arg(&self) -> String {
        format!("--file={}", self.path)
    }
}

impl Applicable for BundleResource<'_> {
    fn description(&self) -> String {
        format!("{} (bundle)", self.path)
    }

    fn command(&self) -> String {
        format!("brew bundle {}", self.file_arg())
    }

    fn apply(&self) -> Result<()> {
        self.brew.run(&["bundle", &self.file_arg()])?;
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
    fn apply_passes_file_flag() {
        let executor = Arc::new(MockExecutor::new());
        let brew = Brew::new(
            Arc::clone(&executor) as Arc<dyn Executor>,
            ShellEnv::with_lookup("/usr/local", |_| None),
            PathBuf::from("/dots"),
            Arc::new(RecordingLog::default()) as Arc<dyn Log>,
        );
        let bundle = BundleResource::new("brew/Brewfile".to_string(), &brew);
        assert_eq!(bundle.description(), "brew/Brewfile (bundle)");
        bundle.apply().unwrap();
        assert_eq!(executor.commands(), vec!["brew bundle --file=brew/Brewfile"]);
    }
}
