//! Build result types.
//!
//! Contains types for representing the outcome of tasks and builds.

use crate::build::TaskKind;
use std::path::PathBuf;
use std::time::Duration;

/// Status of a single task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task ran to completion
    Success,
    /// Nothing to do (optional source tree absent)
    Skipped,
    /// Task aborted
    Failed(String),
}

impl TaskStatus {
    /// Check if the status indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Skipped)
    }

    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskStatus::Failed(_))
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Success => write!(f, "success"),
            TaskStatus::Skipped => write!(f, "skipped"),
            TaskStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// A source file that failed to compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub file: PathBuf,
    pub message: String,
}

impl FileError {
    pub fn new(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self { file: file.into(), message: message.into() }
    }
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Result of running a single task.
#[derive(Debug, Clone)]
pub struct TaskResult {
    /// Task that ran
    pub task: TaskKind,
    /// Task status
    pub status: TaskStatus,
    /// Files written
    pub outputs: Vec<PathBuf>,
    /// Per-file failures that did not abort the task
    pub file_errors: Vec<FileError>,
    /// Task duration
    pub duration: Duration,
}

impl TaskResult {
    /// Create a successful result.
    pub fn success(task: TaskKind, outputs: Vec<PathBuf>, duration: Duration) -> Self {
        Self { task, status: TaskStatus::Success, outputs, file_errors: vec![], duration }
    }

    /// Create a skipped result.
    pub fn skipped(task: TaskKind) -> Self {
        Self {
            task,
            status: TaskStatus::Skipped,
            outputs: vec![],
            file_errors: vec![],
            duration: Duration::ZERO,
        }
    }

    /// Create a failed result.
    pub fn failed(task: TaskKind, error: String, duration: Duration) -> Self {
        Self { task, status: TaskStatus::Failed(error), outputs: vec![], file_errors: vec![], duration }
    }

    /// Attach per-file errors.
    pub fn with_file_errors(mut self, file_errors: Vec<FileError>) -> Self {
        self.file_errors = file_errors;
        self
    }

    /// Check if this result is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a complete build run.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Results for each task
    pub tasks: Vec<TaskResult>,
    /// Total build duration
    pub total_duration: Duration,
}

impl BuildResult {
    /// Create a new empty build result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task result.
    pub fn add_result(&mut self, result: TaskResult) {
        self.tasks.push(result);
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    /// Result for a given task, if it ran.
    pub fn get(&self, task: TaskKind) -> Option<&TaskResult> {
        self.tasks.iter().find(|r| r.task == task)
    }

    pub fn success_count(&self) -> usize {
        self.tasks.iter().filter(|r| matches!(r.status, TaskStatus::Success)).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.tasks.iter().filter(|r| matches!(r.status, TaskStatus::Skipped)).count()
    }

    pub fn failed_count(&self) -> usize {
        self.tasks.iter().filter(|r| r.status.is_failure()).count()
    }

    /// Check if the overall build succeeded (no failed tasks).
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Get all outputs produced.
    pub fn all_outputs(&self) -> Vec<&PathBuf> {
        self.tasks.iter().flat_map(|r| r.outputs.iter()).collect()
    }

    /// Get all per-file errors.
    pub fn file_errors(&self) -> Vec<&FileError> {
        self.tasks.iter().flat_map(|r| r.file_errors.iter()).collect()
    }

    /// Get failed task results.
    pub fn failures(&self) -> Vec<&TaskResult> {
        self.tasks.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Format a summary of the build result.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let success = self.success_count();
        let skipped = self.skipped_count();
        let failed = self.failed_count();
        let total = self.tasks.len();
        let outputs = self.all_outputs().len();

        if failed > 0 {
            lines.push(format!(
                "Build failed: {} succeeded, {} skipped, {} failed ({} total)",
                success, skipped, failed, total
            ));
            for task in self.failures() {
                lines.push(format!("  - {}: {}", task.task, task.status));
            }
        } else {
            lines.push(format!(
                "Build succeeded: {} ran, {} skipped ({} total), {} files written in {:?}",
                success, skipped, total, outputs, self.total_duration
            ));
        }

        let file_errors = self.file_errors();
        if !file_errors.is_empty() {
            lines.push(format!("Compile errors ({}):", file_errors.len()));
            for error in file_errors.iter().take(5) {
                lines.push(format!("  - {}", error));
            }
            if file_errors.len() > 5 {
                lines.push(format!("  ... and {} more", file_errors.len() - 5));
            }
        }

        lines.join("\n")
    }
}
