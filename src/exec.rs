//! Subprocess execution behind an injectable [`Executor`] trait.
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over process execution so tests can script `brew` responses.
///
/// Every method fails with an error when the program exits non-zero.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command with captured output.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command in `dir` with extra environment variables and captured
    /// output.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run_in_with_env(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult>;

    /// Run a command in `dir` with the terminal attached (stdin, stdout and
    /// stderr inherited), for interactive installers.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run_interactive(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()>;

    /// Check whether `program` resolves on the given `PATH` value.
    fn which_in(&self, program: &str, path: &str, cwd: &Path) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

/// Execute a command and return the result, bailing on non-zero exit.
fn execute_checked(mut cmd: Command, label: &str) -> Result<ExecResult> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to execute: {label}"))?;
    let result = ExecResult::from(output);
    if !result.success {
        bail!(
            "{label} failed (exit {}): {}",
            result.code.unwrap_or(-1),
            result.stderr.trim()
        );
    }
    Ok(result)
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        execute_checked(cmd, program)
    }

    fn run_in_with_env(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(dir)
            .envs(env.iter().copied());
        execute_checked(cmd, &format!("{program} in {}", dir.display()))
    }

    fn run_interactive(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
        let status = Command::new(program)
            .args(args)
            .current_dir(dir)
            .status()
            .with_context(|| format!("failed to execute: {program}"))?;
        if !status.success() {
            bail!("{program} failed (exit {})", status.code().unwrap_or(-1));
        }
        Ok(())
    }

    fn which_in(&self, program: &str, path: &str, cwd: &Path) -> bool {
        which::which_in(program, Some(path), cwd).is_ok()
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn run_echo() {
        let result = SystemExecutor.run("echo", &["hello"]).unwrap();
        assert!(result.success, "echo command should succeed");
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn run_failure() {
        let result = SystemExecutor.run("false", &[]);
        assert!(result.is_err(), "non-zero exit should produce an error");
    }

    #[test]
    fn run_missing_program() {
        let err = SystemExecutor
            .run("this-program-does-not-exist-12345", &[])
            .unwrap_err();
        assert!(err.to_string().contains("failed to execute"));
    }

    #[test]
    fn run_in_with_env_sets_dir_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemExecutor
            .run_in_with_env(
                dir.path(),
                "sh",
                &["-c", "echo \"$DOTBREW_TEST_VAR\"; pwd"],
                &[("DOTBREW_TEST_VAR", "marker")],
            )
            .unwrap();
        let mut lines = result.stdout.lines();
        assert_eq!(lines.next(), Some("marker"));
        let cwd = std::fs::canonicalize(lines.next().unwrap()).unwrap();
        assert_eq!(cwd, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn run_in_with_env_reports_stderr() {
        let dir = std::env::temp_dir();
        let err = SystemExecutor
            .run_in_with_env(&dir, "sh", &["-c", "echo boom >&2; exit 3"], &[])
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("exit 3"), "unexpected message: {msg}");
        assert!(msg.contains("boom"), "unexpected message: {msg}");
    }

    #[test]
    fn run_interactive_propagates_exit_status() {
        let dir = std::env::temp_dir();
        assert!(SystemExecutor.run_interactive(&dir, "true", &[]).is_ok());
        assert!(SystemExecutor.run_interactive(&dir, "false", &[]).is_err());
    }

    #[test]
    fn which_in_respects_path() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = std::env::temp_dir();
        assert!(SystemExecutor.which_in("sh", "/bin:/usr/bin", &cwd));
        assert!(!SystemExecutor.which_in(
            "sh",
            &dir.path().to_string_lossy(),
            &cwd
        ));
    }
}
