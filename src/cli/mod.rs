//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod build;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::build::TaskKind;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Porter - WordPress theme asset pipeline
#[derive(Parser)]
#[command(name = "porter")]
#[command(about = "Porter - compile SCSS and JavaScript, extract theme colors, scaffold blocks")]
#[command(version)]
pub struct Cli {
    /// Project root (defaults to the directory holding porter.toml, or the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to the nearest porter.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full build once: colors, then every compile task
    Build {
        /// Exit with an error when any file failed to compile
        #[arg(long)]
        strict: bool,
    },

    /// Build, then rebuild affected tasks on every change
    Watch {
        /// Never run two invocations of the same task at once
        #[arg(long)]
        exclusive: bool,
    },

    /// Run the named tasks in order
    Run {
        /// Tasks to run
        #[arg(required = true, value_enum)]
        tasks: Vec<TaskKind>,

        /// Exit with an error when any file failed to compile
        #[arg(long)]
        strict: bool,
    },

    /// List available tasks
    Tasks,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `info`, or `debug` when verbose.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    // try_init: a subscriber may already be installed (tests)
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

/// Run the CLI application.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project = build::ProjectArgs { root: cli.root, config: cli.config };

    match cli.command {
        Commands::Build { strict } => build::run_build(&project, strict),
        Commands::Watch { exclusive } => build::run_watch(&project, exclusive),
        Commands::Run { tasks, strict } => build::run_tasks(&project, &tasks, strict),
        Commands::Tasks => build::list_tasks(),
    }
}
