//! Build pipeline module for porter
//!
//! Provides the tasks that turn a theme's sources into its compiled
//! assets, and the orchestration that runs them.
//!
//! # Overview
//!
//! The build pipeline consists of:
//! - **Discovery**: Find source files using glob patterns from config
//! - **Tasks**: Color extraction, SCSS compilation per style tree, script
//!   minification and scaffolding
//! - **Orchestration**: Run one task, a series, or the full build
//!
//! # Example
//!
//! ```ignore
//! use porter::build::{BuildContext, Pipeline};
//! use porter::config::load_project;
//!
//! let loaded = load_project(None, None)?;
//! let pipeline = Pipeline::new(BuildContext::new(loaded.config, loaded.root));
//!
//! let result = pipeline.build();
//! println!("{}", result.summary());
//! ```

pub mod context;
pub mod discovery;
pub mod pipeline;
pub mod result;
pub mod script;
pub mod style;
pub mod task;

pub use context::*;
pub use discovery::*;
pub use pipeline::*;
pub use result::*;
pub use script::{minify_script, ScriptBundler};
pub use style::{limit_line_length, prefix_and_minify, StyleCompiler};
pub use task::*;
