//! Build command implementations (build, watch, run, tasks)

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{debug, error};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::build::{BuildContext, BuildResult, Pipeline, TaskKind};
use crate::config::loader::{load_project, merge_cli_overrides, CliOverrides};

/// Project selection flags shared by every command
pub struct ProjectArgs {
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Load the configuration and build a context, or the exit code to fail with.
fn load_context(project: &ProjectArgs, overrides: &CliOverrides) -> Result<BuildContext, ExitCode> {
    let loaded = match load_project(project.config.as_deref(), project.root.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };

    match &loaded.source {
        Some(path) => debug!(config = %path.display(), "using config"),
        None => debug!("no porter.toml found, using defaults"),
    }

    let root = absolute_root(&loaded.root);
    if !root.is_dir() {
        eprintln!("Error: Project root not found: {}", root.display());
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }

    let mut config = loaded.config;
    merge_cli_overrides(&mut config, overrides);
    Ok(BuildContext::new(config, root))
}

fn absolute_root(root: &Path) -> PathBuf {
    root.canonicalize().unwrap_or_else(|_| root.to_path_buf())
}

/// Print the summary and choose the exit code.
fn report(result: &BuildResult, strict: bool) -> ExitCode {
    let has_file_errors = !result.file_errors().is_empty();
    if result.is_success() && !(strict && has_file_errors) {
        println!("{}", result.summary());
        ExitCode::from(EXIT_SUCCESS)
    } else {
        eprintln!("{}", result.summary());
        ExitCode::from(EXIT_ERROR)
    }
}

/// Run the build command
pub fn run_build(project: &ProjectArgs, strict: bool) -> ExitCode {
    let context = match load_context(project, &CliOverrides::default()) {
        Ok(context) => context.with_strict(strict),
        Err(code) => return code,
    };

    println!("Building {}...", context.project_root().display());
    let result = Pipeline::new(context.clone()).build();
    report(&result, context.is_strict())
}

/// Run the watch command
pub fn run_watch(project: &ProjectArgs, exclusive: bool) -> ExitCode {
    let overrides = CliOverrides { exclusive: exclusive.then_some(true) };
    let context = match load_context(project, &overrides) {
        Ok(context) => context,
        Err(code) => return code,
    };

    println!("Starting watch mode...");
    println!("Press Ctrl+C to stop");
    println!();

    match crate::watch::watch(Arc::new(Pipeline::new(context))) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            error!("{}", e);
            eprintln!("Watch error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run the named tasks in series
pub fn run_tasks(project: &ProjectArgs, tasks: &[TaskKind], strict: bool) -> ExitCode {
    let context = match load_context(project, &CliOverrides::default()) {
        Ok(context) => context.with_strict(strict),
        Err(code) => return code,
    };

    let result = Pipeline::new(context.clone()).run_series(tasks);
    report(&result, context.is_strict())
}

/// List available tasks
pub fn list_tasks() -> ExitCode {
    let width = TaskKind::ALL.iter().map(|t| t.name().len()).max().unwrap_or(0);
    for task in TaskKind::ALL {
        println!("{:width$}  {}", task.name(), task.description(), width = width);
    }
    ExitCode::from(EXIT_SUCCESS)
}
