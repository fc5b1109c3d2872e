//! Maps directives onto sequences of `brew` commands.
//!
//! [`DirectiveProcessor::handle`] is the single entry point: it rejects
//! directives the platform cannot run, makes sure `brew` exists
//! (bootstrapping it when it does not), and then runs the directive's
//! handler. Handlers stop at the first failing item and report `false`;
//! command failures are logged, never raised.
use std::path::PathBuf;
use std::sync::Arc;

use crate::brew::{Brew, INSTALL_URL, ShellEnv};
use crate::directive::Directive;
use crate::error::DirectiveError;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;
use crate::resources::bundle::BundleResource;
use crate::resources::package::{PackageKind, PackageResource};
use crate::resources::tap::{CASK_TAP, TapResource};
use crate::resources::{Applicable, Resource};

/// Executes directives against Homebrew.
#[derive(Debug)]
pub struct DirectiveProcessor {
    platform: Arc<Platform>,
    brew: Brew,
    log: Arc<dyn Log>,
    dry_run: bool,
}

impl DirectiveProcessor {
    /// Create a processor whose commands run in `base_dir` with the
    /// Homebrew environment for `platform`.
    #[must_use]
    pub fn new(
        platform: Arc<Platform>,
        executor: Arc<dyn Executor>,
        log: Arc<dyn Log>,
        base_dir: PathBuf,
    ) -> Self {
        let env = ShellEnv::from_process(platform.homebrew_prefix());
        Self::with_env(platform, executor, log, base_dir, env)
    }

    /// Create a processor with an explicit environment.
    #[must_use]
    pub fn with_env(
        platform: Arc<Platform>,
        executor: Arc<dyn Executor>,
        log: Arc<dyn Log>,
        base_dir: PathBuf,
        env: ShellEnv,
    ) -> Self {
        let brew = Brew::new(executor, env, base_dir, Arc::clone(&log));
        Self {
            platform,
            brew,
            log,
            dry_run: false,
        }
    }

    /// Log mutating commands instead of running them.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether mutating commands are only logged.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Whether `directive` names a directive supported on this platform.
    #[must_use]
    pub fn can_handle(&self, directive: &str) -> bool {
        self.resolve(directive).is_some()
    }

    fn resolve(&self, directive: &str) -> Option<Directive> {
        Directive::from_name(directive).filter(|d| d.is_supported_on(&self.platform))
    }

    /// Run `directive` over `data`.
    ///
    /// Returns `Ok(true)` when every item succeeded and `Ok(false)` when an
    /// item failed; remaining items are not attempted after a failure.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::Unsupported`] if [`can_handle`](Self::can_handle)
    /// rejects `directive`. No command is run in that case.
    pub fn handle(&self, directive: &str, data: &[String]) -> Result<bool, DirectiveError> {
        let resolved = self
            .resolve(directive)
            .ok_or_else(|| DirectiveError::Unsupported {
                directive: directive.to_string(),
                platform: self.platform.os,
            })?;

        // Without brew a dry run has nothing to query, so every package is
        // reported as missing.
        let can_query = self.ensure_brew() || !self.dry_run;

        if self.platform.is_macos() {
            // Errors here are ignored.
            let cask_tap = TapResource::new(CASK_TAP.to_string(), &self.brew);
            if self.dry_run {
                self.log.dry_run(&cask_tap.command());
            } else if let Err(e) = cask_tap.apply() {
                self.log
                    .debug(&format!("ignoring failed {}: {e:#}", cask_tap.description()));
            }
        }

        Ok(match resolved {
            Directive::Tap => self.tap(data),
            Directive::Brew => self.process_packages(PackageKind::Formula, data, can_query),
            Directive::Cask => self.process_packages(PackageKind::Cask, data, can_query),
            Directive::Brewfile => self.install_bundle(data),
        })
    }

    /// Bootstrap Homebrew if `brew` does not resolve. Returns whether it
    /// was already installed.
    fn ensure_brew(&self) -> bool {
        if self.brew.is_installed() {
            return true;
        }
        self.log.info("Brew not found, installing");
        if self.dry_run {
            self.log.dry_run(&format!("install Homebrew from {INSTALL_URL}"));
        } else {
            self.bootstrap();
        }
        false
    }

    /// Install Homebrew, then update it. Failures are logged, not returned.
    fn bootstrap(&self) {
        if let Err(e) = self.brew.run_install_script() {
            self.log.warn(&format!("Brew could not be installed - {e:#}"));
            return;
        }

        self.log.info("Updating brew");
        if let Err(e) = self.brew.run(&["update"]) {
            self.log.warn(&format!("Brew could not be updated - {e:#}"));
        }
    }

    fn tap(&self, taps: &[String]) -> bool {
        for tap in taps {
            self.log.info(&format!("Tapping {tap}"));
            let resource = TapResource::new(tap.clone(), &self.brew);
            if self.dry_run {
                self.log.dry_run(&resource.command());
                continue;
            }
            if let Err(e) = resource.apply() {
                self.log.warn(&format!("Failed to tap [{tap}] - {e:#}"));
                return false;
            }
            self.log.debug(&format!("applied {}", resource.description()));
        }
        true
    }

    fn process_packages(&self, kind: PackageKind, packages: &[String], can_query: bool) -> bool {
        let success = self.install(kind, packages, can_query);
        if success {
            self.log
                .info(&format!("All brew {} have been installed", kind.plural()));
        } else {
            self.log
                .error(&format!("Some brew {} were not installed", kind.plural()));
        }
        success
    }

    fn install(&self, kind: PackageKind, packages: &[String], can_query: bool) -> bool {
        for package in packages {
            let resource = PackageResource::new(package.clone(), kind, &self.brew);
            if can_query && !resource.needs_change() {
                self.log
                    .debug(&format!("{} already installed", resource.description()));
                continue;
            }
            self.log.info(&format!("Installing {package}"));
            if self.dry_run {
                self.log.dry_run(&resource.command());
                continue;
            }
            if let Err(e) = resource.apply() {
                self.log
                    .warn(&format!("Failed to install [{package}] - {e:#}"));
                return false;
            }
            self.log.debug(&format!("applied {}", resource.description()));
        }
        true
    }

    fn install_bundle(&self, files: &[String]) -> bool {
        for file in files {
            self.log.info(&format!("Installing from file {file}"));
            let resource = BundleResource::new(file.clone(), &self.brew);
            if self.dry_run {
                self.log.dry_run(&resource.command());
                continue;
            }
            if let Err(e) = resource.apply() {
                self.log
                    .warn(&format!("Failed to install file [{file}] - {e:#}"));
                return false;
            }
            self.log.debug(&format!("applied {}", resource.description()));
        }
        true
    }
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
    use crate::platform::{Arch, Os};
    use crate::resources::test_helpers::MockExecutor;

    const MAC: Platform = Platform::new(Os::MacOs, Arch::Aarch64);
    const LINUX: Platform = Platform::new(Os::Linux, Arch::Other);

    struct Harness {
        processor: DirectiveProcessor,
        executor: Arc<MockExecutor>,
        log: Arc<RecordingLog>,
    }

    fn harness(platform: Platform, executor: MockExecutor) -> Harness {
        let executor = Arc::new(executor);
        let log = Arc::new(RecordingLog::default());
        let processor = DirectiveProcessor::with_env(
            Arc::new(platform.clone()),
            Arc::clone(&executor) as Arc<dyn Executor>,
            Arc::clone(&log) as Arc<dyn Log>,
            PathBuf::from("/dots"),
            ShellEnv::with_lookup(platform.homebrew_prefix(), |_| None),
        );
        Harness {
            processor,
            executor,
            log,
        }
    }

    fn linux(executor: MockExecutor) -> Harness {
        harness(LINUX, executor.with_brew_installed(true))
    }

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    // ------------------------------------------------------------------
    // can_handle
    // ------------------------------------------------------------------

    #[test]
    fn can_handle_supported_directives() {
        let h = harness(MAC, MockExecutor::new());
        for name in ["tap", "brew", "cask", "brewfile"] {
            assert!(h.processor.can_handle(name), "{name} should be handled");
        }
    }

    #[test]
    fn can_handle_rejects_unknown_directives() {
        let h = harness(MAC, MockExecutor::new());
        for name in ["link", "shell", "Brew", "casks", ""] {
            assert!(!h.processor.can_handle(name), "{name} should be rejected");
        }
    }

    #[test]
    fn can_handle_rejects_cask_on_linux() {
        let h = harness(LINUX, MockExecutor::new());
        assert!(!h.processor.can_handle("cask"));
        assert!(h.processor.can_handle("brewfile"));
    }

    #[test]
    fn can_handle_has_no_side_effects() {
        let h = harness(MAC, MockExecutor::new());
        assert!(h.processor.can_handle("brew"));
        assert!(h.executor.calls().is_empty());
    }

    // ------------------------------------------------------------------
    // handle
    // ------------------------------------------------------------------

    #[test]
    fn handle_unsupported_directive_is_an_error_without_commands() {
        let h = linux(MockExecutor::new());
        let err = h.processor.handle("cask", &list(&["firefox"])).unwrap_err();
        assert_eq!(
            err,
            DirectiveError::Unsupported {
                directive: "cask".to_string(),
                platform: Os::Linux,
            }
        );
        assert!(h.executor.calls().is_empty());
    }

    #[test]
    fn handle_taps_cask_repository_on_macos() {
        let h = harness(MAC, MockExecutor::new().with_brew_installed(true));
        assert!(h.processor.handle("tap", &list(&["foo/bar"])).unwrap());
        assert_eq!(
            h.executor.commands(),
            vec!["brew tap homebrew/cask", "brew tap foo/bar"]
        );
    }

    #[test]
    fn handle_ignores_cask_tap_failure() {
        let executor = MockExecutor::new()
            .with_brew_installed(true)
            .failing("brew tap homebrew/cask");
        let h = harness(MAC, executor);
        assert!(h.processor.handle("cask", &list(&["firefox"])).unwrap());
        assert!(h.log.messages("warn").is_empty());
        assert!(h.executor.ran("brew ls --versions --cask firefox"));
    }

    #[test]
    fn handle_skips_cask_tap_on_linux() {
        let h = linux(MockExecutor::new());
        assert!(h.processor.handle("brew", &list(&["git"])).unwrap());
        assert!(!h.executor.ran("brew tap homebrew/cask"));
    }

    #[test]
    fn handle_runs_commands_in_base_dir_with_env() {
        let h = linux(MockExecutor::new());
        h.processor.handle("brewfile", &list(&["Brewfile"])).unwrap();
        let calls = h.executor.calls();
        let crate::resources::test_helpers::Call::Run { dir, env, .. } = &calls[1] else {
            panic!("expected a run call, got {:?}", calls[1]);
        };
        assert_eq!(dir.as_deref(), Some(std::path::Path::new("/dots")));
        assert!(
            env.iter()
                .any(|(k, v)| k == "HOMEBREW_CELLAR" && v == "/home/linuxbrew/.linuxbrew/Cellar")
        );
    }

    #[test]
    fn handle_empty_list_succeeds() {
        let h = linux(MockExecutor::new());
        assert!(h.processor.handle("tap", &[]).unwrap());
        assert!(h.processor.handle("brewfile", &[]).unwrap());
        assert!(h.executor.commands().is_empty());
    }

    // ------------------------------------------------------------------
    // bootstrap
    // ------------------------------------------------------------------

    #[test]
    fn bootstrap_runs_when_brew_missing() {
        let h = harness(LINUX, MockExecutor::new());
        assert!(h.processor.handle("tap", &list(&["foo/bar"])).unwrap());
        assert!(h.log.contains("info", "Brew not found, installing"));
        assert!(h.log.contains("info", "Updating brew"));
        let commands = h.executor.commands();
        assert_eq!(commands[0], format!("curl -fsSL {INSTALL_URL}"));
        assert!(commands[1].starts_with("/bin/bash -c"));
        assert_eq!(commands[2], "brew update");
        assert_eq!(commands[3], "brew tap foo/bar");
    }

    #[test]
    fn bootstrap_failure_does_not_abort_directive() {
        let h = harness(LINUX, MockExecutor::new().failing("/bin/bash"));
        let result = h.processor.handle("brew", &list(&["git"]));
        assert!(result.is_ok());
        assert!(h.log.contains("warn", "Brew could not be installed"));
        assert!(!h.log.contains("info", "Updating brew"));
        assert!(!h.executor.ran("brew update"));
        assert!(h.executor.ran("brew ls --versions git"));
    }

    #[test]
    fn update_failure_is_only_a_warning() {
        let h = harness(LINUX, MockExecutor::new().failing("brew update"));
        assert!(h.processor.handle("tap", &list(&["foo/bar"])).unwrap());
        assert!(h.log.contains("warn", "Brew could not be updated"));
        assert!(h.executor.ran("brew tap foo/bar"));
    }

    #[test]
    fn bootstrap_skipped_when_brew_present() {
        let h = linux(MockExecutor::new());
        h.processor.handle("tap", &list(&["foo/bar"])).unwrap();
        assert!(!h.log.contains("info", "Brew not found"));
        assert_eq!(h.executor.commands(), vec!["brew tap foo/bar"]);
    }

    // ------------------------------------------------------------------
    // tap
    // ------------------------------------------------------------------

    #[test]
    fn tap_stops_at_first_failure() {
        let h = linux(MockExecutor::new().failing("brew tap first/tap"));
        let ok = h
            .processor
            .handle("tap", &list(&["first/tap", "second/tap"]))
            .unwrap();
        assert!(!ok);
        assert!(h.executor.ran("brew tap first/tap"));
        assert!(!h.executor.ran("brew tap second/tap"));
        assert_eq!(h.log.count("warn", "Failed to tap [first/tap]"), 1);
    }

    #[test]
    fn tap_logs_each_tap() {
        let h = linux(MockExecutor::new());
        assert!(h.processor.handle("tap", &list(&["a/b", "c/d"])).unwrap());
        assert_eq!(h.log.messages("info"), vec!["Tapping a/b", "Tapping c/d"]);
    }

    // ------------------------------------------------------------------
    // install
    // ------------------------------------------------------------------

    #[test]
    fn install_stops_at_first_failure() {
        let executor = MockExecutor::new()
            .failing("brew ls --versions")
            .failing("brew install two");
        let h = linux(executor);
        let ok = h
            .processor
            .handle("brew", &list(&["one", "two", "three"]))
            .unwrap();
        assert!(!ok);
        assert!(h.executor.ran("brew install one"));
        assert!(h.executor.ran("brew install two"));
        assert!(!h.executor.ran("brew ls --versions three"));
        assert!(!h.executor.ran("brew install three"));
    }

    #[test]
    fn install_skips_installed_packages() {
        let h = linux(MockExecutor::new());
        assert!(h.processor.handle("brew", &list(&["git"])).unwrap());
        assert!(h.executor.ran("brew ls --versions git"));
        assert!(!h.executor.ran("brew install git"));
        assert!(!h.log.contains("info", "Installing git"));
    }

    #[test]
    fn install_git_installed_curl_fails() {
        let executor = MockExecutor::new()
            .failing("brew ls --versions curl")
            .failing("brew install curl");
        let h = linux(executor);
        let ok = h.processor.handle("brew", &list(&["git", "curl"])).unwrap();
        assert!(!ok);
        assert_eq!(h.log.count("info", "Installing curl"), 1);
        assert_eq!(h.log.messages("warn").len(), 1);
        assert!(h.log.contains("warn", "Failed to install [curl]"));
        assert!(h.log.contains("error", "Some brew formulae were not installed"));
        assert!(!h.executor.ran("brew install git"));
    }

    #[test]
    fn install_reports_success() {
        let h = linux(MockExecutor::new().failing("brew ls --versions"));
        assert!(h.processor.handle("brew", &list(&["git", "curl"])).unwrap());
        assert!(h.log.contains("info", "All brew formulae have been installed"));
        assert_eq!(
            h.executor.commands(),
            vec![
                "brew ls --versions git",
                "brew install git",
                "brew ls --versions curl",
                "brew install curl"
            ]
        );
    }

    #[test]
    fn cask_uses_cask_flag_everywhere() {
        let executor = MockExecutor::new()
            .with_brew_installed(true)
            .failing("brew ls --versions");
        let h = harness(MAC, executor);
        assert!(h.processor.handle("cask", &list(&["firefox"])).unwrap());
        assert!(h.executor.ran("brew ls --versions --cask firefox"));
        assert!(h.executor.ran("brew install --cask firefox"));
        assert!(h.log.contains("info", "All brew casks have been installed"));
    }

    // ------------------------------------------------------------------
    // bundle
    // ------------------------------------------------------------------

    #[test]
    fn applied_and_skipped_resources_are_described() {
        let executor = MockExecutor::new()
            .with_brew_installed(true)
            .failing("brew ls --versions curl")
            .failing("brew tap homebrew/cask");
        let h = harness(MAC, executor);
        assert!(h.processor.handle("tap", &list(&["a/b"])).unwrap());
        assert!(h.processor.handle("brew", &list(&["git", "curl"])).unwrap());
        assert!(h.processor.handle("brewfile", &list(&["Brewfile"])).unwrap());

        assert!(h.log.contains("debug", "ignoring failed homebrew/cask (tap)"));
        assert!(h.log.contains("debug", "applied a/b (tap)"));
        assert!(h.log.contains("debug", "git (formula) already installed"));
        assert!(h.log.contains("debug", "applied curl (formula)"));
        assert!(h.log.contains("debug", "applied Brewfile (bundle)"));
    }

    #[test]
    fn bundle_stops_at_first_failure() {
        let h = linux(MockExecutor::new().failing("brew bundle --file=Brewfile"));
        let ok = h
            .processor
            .handle("brewfile", &list(&["Brewfile", "Brewfile.work"]))
            .unwrap();
        assert!(!ok);
        assert!(!h.executor.ran("brew bundle --file=Brewfile.work"));
        assert!(h.log.contains("warn", "Failed to install file [Brewfile]"));
    }

    #[test]
    fn bundle_installs_every_file() {
        let h = linux(MockExecutor::new());
        assert!(
            h.processor
                .handle("brewfile", &list(&["Brewfile", "Brewfile.work"]))
                .unwrap()
        );
        assert_eq!(
            h.executor.commands(),
            vec![
                "brew bundle --file=Brewfile",
                "brew bundle --file=Brewfile.work"
            ]
        );
        assert!(h.log.contains("info", "Installing from file Brewfile.work"));
    }

    // ------------------------------------------------------------------
    // dry run
    // ------------------------------------------------------------------

    #[test]
    fn dry_run_never_mutates() {
        let executor = MockExecutor::new()
            .with_brew_installed(true)
            .failing("brew ls --versions curl");
        let h = harness(MAC, executor);
        let processor = h.processor.with_dry_run(true);
        assert!(processor.handle("tap", &list(&["foo/bar"])).unwrap());
        assert!(processor.handle("brew", &list(&["git", "curl"])).unwrap());
        assert!(processor.handle("brewfile", &list(&["Brewfile"])).unwrap());

        for command in h.executor.commands() {
            assert!(
                command.starts_with("brew ls --versions"),
                "dry run executed a mutating command: {command}"
            );
        }
        let dry = h.log.messages("dry_run");
        assert!(dry.contains(&"brew tap homebrew/cask".to_string()));
        assert!(dry.contains(&"brew tap foo/bar".to_string()));
        assert!(dry.contains(&"brew install curl".to_string()));
        assert!(!dry.contains(&"brew install git".to_string()));
        assert!(dry.contains(&"brew bundle --file=Brewfile".to_string()));
    }

    #[test]
    fn dry_run_without_brew_runs_nothing() {
        let h = harness(LINUX, MockExecutor::new());
        let processor = h.processor.with_dry_run(true);
        assert!(processor.handle("brew", &list(&["git"])).unwrap());

        assert!(h.executor.commands().is_empty());
        assert!(h.log.contains("info", "Brew not found, installing"));
        let dry = h.log.messages("dry_run");
        assert!(dry.iter().any(|m| m.contains("install Homebrew")));
        assert!(dry.contains(&"brew install git".to_string()));
    }
}
