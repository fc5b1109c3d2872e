//! Invocation of the `brew` binary with the Homebrew environment applied.
pub mod env;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

pub use env::ShellEnv;

use crate::exec::{ExecResult, Executor};
use crate::logging::Log;

/// Name of the Homebrew binary.
pub const PROGRAM: &str = "brew";

/// Official Homebrew install script.
pub const INSTALL_URL: &str = "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";

/// Shell used to run the install script.
const BASH: &str = "/bin/bash";

/// Runs `brew` subcommands from a fixed working directory with a fixed
/// [`ShellEnv`].
///
/// Every command line is logged at debug level before it is executed.
#[derive(Debug)]
pub struct Brew {
    executor: Arc<dyn Executor>,
    env: ShellEnv,
    base_dir: PathBuf,
    log: Arc<dyn Log>,
}

impl Brew {
    /// Create a runner.
    #[must_use]
    pub fn new(
        executor: Arc<dyn Executor>,
        env: ShellEnv,
        base_dir: PathBuf,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            executor,
            env,
            base_dir,
            log,
        }
    }

    /// Whether `brew` resolves on the injected `PATH`.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.log.debug(&format!("hash {PROGRAM}"));
        self.executor
            .which_in(PROGRAM, self.env.path(), &self.base_dir)
    }

    /// Run `brew <args>`.
    ///
    /// # Errors
    ///
    /// Returns an error if `brew` cannot be spawned or exits non-zero.
    pub fn run(&self, args: &[&str]) -> Result<ExecResult> {
        self.log.debug(&render(PROGRAM, args));
        self.executor
            .run_in_with_env(&self.base_dir, PROGRAM, args, &self.env.pairs())
    }

    /// Download the official install script and run it with the terminal
    /// attached. The Homebrew environment is not applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be downloaded or exits non-zero.
    pub fn run_install_script(&self) -> Result<()> {
        let fetch_args = ["-fsSL", INSTALL_URL];
        self.log.debug(&render("curl", &fetch_args));
        let script = self
            .executor
            .run("curl", &fetch_args)
            .context("downloading the Homebrew install script")?
            .stdout;

        self.log
            .debug(&format!("{BASH} -c \"$(curl -fsSL {INSTALL_URL})\""));
        self.executor
            .run_interactive(&self.base_dir, BASH, &["-c", &script])
            .context("running the Homebrew install script")
    }
}

/// Render a command line for logging.
fn render(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::logging::test_helpers::RecordingLog;
    use crate::resources::test_helpers::{Call, MockExecutor};
    use std::path::Path;

    fn brew(executor: &Arc<MockExecutor>, log: &Arc<RecordingLog>) -> Brew {
        Brew::new(
            Arc::clone(executor) as Arc<dyn Executor>,
            ShellEnv::with_lookup("/opt/homebrew", |_| None),
            PathBuf::from("/dots"),
            Arc::clone(log) as Arc<dyn Log>,
        )
    }

    #[test]
    fn render_joins_program_and_args() {
        assert_eq!(render("brew", &["ls", "--versions", "git"]), "brew ls --versions git");
        assert_eq!(render("brew", &[]), "brew");
    }

    #[test]
    fn run_applies_env_and_base_dir() {
        let executor = Arc::new(MockExecutor::new());
        let log = Arc::new(RecordingLog::default());
        brew(&executor, &log).run(&["tap", "homebrew/cask"]).unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        let Call::Run { dir, command, env } = &calls[0] else {
            panic!("expected a captured run, got {:?}", calls[0]);
        };
        assert_eq!(command, "brew tap homebrew/cask");
        assert_eq!(dir.as_deref(), Some(Path::new("/dots")));
        assert!(env.iter().any(|(k, v)| k == "HOMEBREW_PREFIX" && v == "/opt/homebrew"));
        assert!(log.contains("debug", "brew tap homebrew/cask"));
    }

    #[test]
    fn is_installed_uses_injected_path() {
        let executor = Arc::new(MockExecutor::new().with_brew_installed(true));
        let log = Arc::new(RecordingLog::default());
        assert!(brew(&executor, &log).is_installed());
        assert_eq!(
            executor.calls(),
            vec![Call::Which {
                program: "brew".to_string(),
                path: "/opt/homebrew/bin:/opt/homebrew/sbin".to_string(),
            }]
        );
    }

    #[test]
    fn install_script_is_downloaded_then_run() {
        let executor = Arc::new(MockExecutor::new().with_stdout("curl -fsSL", "echo installed"));
        let log = Arc::new(RecordingLog::default());
        brew(&executor, &log).run_install_script().unwrap();
        assert_eq!(
            executor.commands(),
            vec![
                format!("curl -fsSL {INSTALL_URL}"),
                "/bin/bash -c echo installed".to_string(),
            ]
        );
    }

    #[test]
    fn install_script_not_run_when_download_fails() {
        let executor = Arc::new(MockExecutor::new().failing("curl"));
        let log = Arc::new(RecordingLog::default());
        let err = brew(&executor, &log).run_install_script().unwrap_err();
        assert!(err.to_string().contains("downloading"));
        assert_eq!(executor.commands().len(), 1);
    }
}
