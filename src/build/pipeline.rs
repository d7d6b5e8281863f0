//! Build pipeline orchestration.
//!
//! The pipeline maps each [`TaskKind`] to the component that implements it
//! and runs tasks singly, in series, or as the full `build`: colors first,
//! then every compile task concurrently on the rayon pool.

use crate::build::discovery::DiscoveryError;
use crate::build::script::ScriptBundler;
use crate::build::style::StyleCompiler;
use crate::build::{BuildContext, BuildResult, TaskKind, TaskResult};
use crate::colors::{extract_colors, ColorError};
use crate::config::StyleTreeConfig;
use crate::scaffold::{scaffold_block_styles, scaffold_posttypes, ScaffoldError};
use rayon::prelude::*;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Fatal error of a single task.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("colors: {0}")]
    Colors(#[from] ColorError),
    #[error("scaffold: {0}")]
    Scaffold(#[from] ScaffoldError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Runs build tasks against one project.
#[derive(Debug, Clone)]
pub struct Pipeline {
    context: BuildContext,
}

impl Pipeline {
    pub fn new(context: BuildContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    fn compile_styles(
        &self,
        task: TaskKind,
        tree: &StyleTreeConfig,
        start: Instant,
    ) -> Result<TaskResult, PipelineError> {
        Ok(match StyleCompiler::new(&self.context, tree).run()? {
            Some(out) => {
                TaskResult::success(task, out.written, start.elapsed()).with_file_errors(out.errors)
            }
            None => TaskResult::skipped(task),
        })
    }

    /// Run one task.
    ///
    /// `Err` means the task aborted. Per-file compile errors do not abort
    /// a task; they are carried on the returned result.
    pub fn run_task(&self, task: TaskKind) -> Result<TaskResult, PipelineError> {
        let start = Instant::now();
        let styles = &self.context.config().styles;
        debug!(%task, "starting task");

        let result = match task {
            TaskKind::Colors => {
                let output = self.context.colors_path();
                let count = extract_colors(&self.context.theme_path(), &output)?;
                info!(colors = count, path = %output.display(), "generated color map");
                TaskResult::success(task, vec![output], start.elapsed())
            }
            TaskKind::Scripts => match ScriptBundler::new(&self.context).run()? {
                Some(out) => {
                    TaskResult::success(task, out.written, start.elapsed()).with_file_errors(out.errors)
                }
                None => TaskResult::skipped(task),
            },
            TaskKind::ScaffoldBlockStyles => {
                let scaffold = &self.context.config().scaffold;
                let report = scaffold_block_styles(
                    &self.context.blocks_registry_path(),
                    &self.context.block_styles_dir(),
                    &scaffold.variables_import,
                )?;
                info!(created = report.created.len(), existing = report.existing, "block styles");
                TaskResult::success(task, report.created, start.elapsed())
            }
            TaskKind::ScaffoldPostTypes => {
                let report = scaffold_posttypes(
                    &self.context.posttypes_registry_path(),
                    &self.context.posttypes_dir(),
                )?;
                info!(created = report.created.len(), existing = report.existing, "post types");
                TaskResult::success(task, report.created, start.elapsed())
            }
            TaskKind::Styles => self.compile_styles(task, &styles.global, start)?,
            TaskKind::Blocks => self.compile_styles(task, &styles.blocks, start)?,
            TaskKind::BlockStyles => self.compile_styles(task, &styles.block_styles, start)?,
            TaskKind::CoreBlockStyles => {
                self.compile_styles(task, &styles.core_block_styles, start)?
            }
            TaskKind::Variations => self.compile_styles(task, &styles.variations, start)?,
        };

        if !result.file_errors.is_empty() {
            warn!(%task, errors = result.file_errors.len(), "finished with compile errors");
        }
        debug!(%task, status = %result.status, duration = ?result.duration, "finished task");
        Ok(result)
    }

    /// Run a task, turning an abort into a failed result.
    pub fn run_task_reported(&self, task: TaskKind) -> TaskResult {
        let start = Instant::now();
        match self.run_task(task) {
            Ok(result) => result,
            Err(e) => {
                error!(%task, "{}", e);
                TaskResult::failed(task, e.to_string(), start.elapsed())
            }
        }
    }

    /// Run tasks one after another, stopping at the first that aborts.
    pub fn run_series(&self, tasks: &[TaskKind]) -> BuildResult {
        let start = Instant::now();
        let mut result = BuildResult::new();

        for &task in tasks {
            let task_result = self.run_task_reported(task);
            let failed = task_result.status.is_failure();
            result.add_result(task_result);
            if failed {
                break;
            }
        }

        result.with_duration(start.elapsed())
    }

    /// Run the full build.
    ///
    /// A colors failure aborts before anything is compiled. The compile
    /// tasks then run concurrently; one aborting does not stop the others.
    pub fn build(&self) -> BuildResult {
        let start = Instant::now();
        let mut result = BuildResult::new();

        let colors = self.run_task_reported(TaskKind::Colors);
        let colors_failed = colors.status.is_failure();
        result.add_result(colors);
        if colors_failed {
            return result.with_duration(start.elapsed());
        }

        let compiled: Vec<TaskResult> =
            TaskKind::COMPILE.par_iter().map(|&task| self.run_task_reported(task)).collect();
        for task_result in compiled {
            result.add_result(task_result);
        }

        result.with_duration(start.elapsed())
    }
}
