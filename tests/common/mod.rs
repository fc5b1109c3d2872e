// Shared helpers for integration tests.
//
// Provides a temporary base directory with a config writer, plus in-memory
// implementations of the public `Executor` and `Log` traits so a whole
// install can run without touching the real system.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use dotbrew::brew::ShellEnv;
use dotbrew::exec::{ExecResult, Executor};
use dotbrew::logging::{Log, TaskEntry, TaskStatus};
use dotbrew::platform::Platform;
use dotbrew::processor::DirectiveProcessor;

/// An isolated base directory backed by a [`tempfile::TempDir`].
#[derive(Debug)]
pub struct TestRepo {
    /// Temporary directory used as the base directory.
    pub root: tempfile::TempDir,
}

impl TestRepo {
    /// Create an empty base directory.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path to the base directory.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write `content` to `brew.toml` and return its path.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.path().join("brew.toml");
        std::fs::write(&path, content).expect("write brew.toml");
        path
    }
}

/// Executor that records command lines and fails the ones it is told to.
///
/// A rule matches a command exactly or as a whole-word prefix.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    commands: Mutex<Vec<String>>,
    failing: Vec<String>,
    brew_installed: bool,
}

impl ScriptedExecutor {
    /// An executor where `brew` resolves and every command succeeds.
    pub fn with_brew() -> Self {
        Self {
            brew_installed: true,
            ..Self::default()
        }
    }

    /// An executor where `brew` is not on `PATH`.
    pub fn without_brew() -> Self {
        Self::default()
    }

    /// Fail commands matching `rule`.
    pub fn failing(mut self, rule: &str) -> Self {
        self.failing.push(rule.to_string());
        self
    }

    /// Every executed command line, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether `command` was executed.
    pub fn ran(&self, command: &str) -> bool {
        self.commands().iter().any(|c| c == command)
    }

    fn exec(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        let command = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.clone());

        let fails = self.failing.iter().any(|rule| {
            command == *rule
                || command
                    .strip_prefix(rule.as_str())
                    .is_some_and(|rest| rest.starts_with(' '))
        });
        if fails {
            anyhow::bail!("{command} failed (exit 1)");
        }
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        })
    }
}

impl Executor for ScriptedExecutor {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.exec(program, args)
    }

    fn run_in_with_env(
        &self,
        _dir: &Path,
        program: &str,
        args: &[&str],
        _env: &[(&str, &str)],
    ) -> anyhow::Result<ExecResult> {
        self.exec(program, args)
    }

    fn run_interactive(&self, _dir: &Path, program: &str, args: &[&str]) -> anyhow::Result<()> {
        self.exec(program, args).map(|_| ())
    }

    fn which_in(&self, _program: &str, _path: &str, _cwd: &Path) -> bool {
        self.brew_installed
    }
}

/// Log that keeps every line in memory as `(level, message)`.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<(&'static str, String)>>,
    tasks: Mutex<Vec<TaskEntry>>,
}

impl MemoryLog {
    fn push(&self, level: &'static str, msg: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, msg.to_string()));
    }

    /// Messages logged at `level`.
    pub fn messages(&self, level: &str) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Number of messages at `level` containing `needle`.
    pub fn count(&self, level: &str, needle: &str) -> usize {
        self.messages(level)
            .iter()
            .filter(|m| m.contains(needle))
            .count()
    }

    /// Recorded task entries.
    pub fn tasks(&self) -> Vec<TaskEntry> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
    }
}

/// Build a processor over the given doubles, running in `base_dir`.
pub fn processor(
    platform: Platform,
    executor: &Arc<ScriptedExecutor>,
    log: &Arc<MemoryLog>,
    base_dir: &Path,
) -> DirectiveProcessor {
    let env = ShellEnv::with_lookup(platform.homebrew_prefix(), |_| None);
    DirectiveProcessor::with_env(
        Arc::new(platform),
        Arc::clone(executor) as Arc<dyn Executor>,
        Arc::clone(log) as Arc<dyn Log>,
        base_dir.to_path_buf(),
        env,
    )
}
