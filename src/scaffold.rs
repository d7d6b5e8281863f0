//! Scaffolding for block styles and custom post types
//!
//! Scaffolders generate placeholder sources only where nothing exists yet.
//! An existing file or directory is never touched, so hand-written work is
//! safe, and entries removed from a registry leave their generated files
//! in place.

pub mod block_styles;
pub mod posttypes;

pub use block_styles::{scaffold_block_styles, BlockStyle};
pub use posttypes::{scaffold_posttypes, DEFAULT_ICON};

use crate::descriptor::DescriptorError;
use std::path::PathBuf;
use thiserror::Error;

/// Error during scaffolding
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Registry missing or malformed
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    /// Block identifier is not `<namespace>/<block>`
    #[error("Invalid block identifier '{0}'. Expected '<namespace>/<block>'.")]
    InvalidBlockName(String),
    /// Post type identifier would not map to a single directory
    #[error("Invalid post type identifier '{0}'")]
    InvalidPostType(String),
    /// Failed to create directory
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to write file
    #[error("Failed to write {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a scaffolding run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    /// Files created by this run
    pub created: Vec<PathBuf>,
    /// Entries skipped because their target already existed
    pub existing: usize,
}
