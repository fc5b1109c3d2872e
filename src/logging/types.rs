//! Core logging types: task entries, status, and the [`Log`] trait.

/// Result of one directive block, for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable name (e.g. `brew #2`).
    pub name: String,
    /// Final status.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed directive block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Every item succeeded.
    Ok,
    /// Not run (filtered out by `--only` / `--skip`).
    Skipped,
    /// Ran in dry-run mode; no changes were applied.
    DryRun,
    /// At least one item failed, or the directive was rejected.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) is the production implementation; tests
/// substitute an in-memory recorder.
pub trait Log: Send + Sync + std::fmt::Debug {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a low-priority message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a block result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_equality() {
        assert_eq!(TaskStatus::Ok, TaskStatus::Ok);
        assert_ne!(TaskStatus::Ok, TaskStatus::Failed);
        assert_ne!(TaskStatus::Skipped, TaskStatus::DryRun);
    }

    #[test]
    fn task_entry_clone() {
        let entry = TaskEntry {
            name: "brew #1".to_string(),
            status: TaskStatus::Ok,
            message: Some("all good".to_string()),
        };
        let cloned = entry.clone();
        assert_eq!(cloned.name, entry.name);
        assert_eq!(cloned.status, entry.status);
        assert_eq!(cloned.message, entry.message);
    }
}
