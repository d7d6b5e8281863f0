//! Build context containing configuration and paths for a build.

use crate::config::{PorterConfig, StyleTreeConfig};
use std::path::{Path, PathBuf};

/// Build context containing configuration and paths for a build operation.
///
/// Every path in the configuration is relative to the project root; the
/// context resolves them so tasks never depend on the working directory.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The loaded configuration
    config: PorterConfig,
    /// Project root directory (where porter.toml and theme.json live)
    project_root: PathBuf,
    /// Treat per-file compile errors as a failed build
    strict: bool,
}

impl BuildContext {
    /// Create a new build context.
    pub fn new(config: PorterConfig, project_root: PathBuf) -> Self {
        Self { config, project_root, strict: false }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PorterConfig {
        &self.config
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Whether strict mode is enabled.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Set strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolve a path relative to the project root.
    ///
    /// If the path is absolute, returns it unchanged.
    /// If relative, joins it with the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    pub fn theme_path(&self) -> PathBuf {
        self.resolve_path(&self.config.paths.theme)
    }

    pub fn colors_path(&self) -> PathBuf {
        self.resolve_path(&self.config.paths.colors)
    }

    pub fn blocks_registry_path(&self) -> PathBuf {
        self.resolve_path(&self.config.paths.blocks)
    }

    pub fn posttypes_registry_path(&self) -> PathBuf {
        self.resolve_path(&self.config.paths.posttypes)
    }

    pub fn block_styles_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.scaffold.block_styles_dir)
    }

    pub fn posttypes_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.scaffold.posttypes_dir)
    }

    /// Source and output directories of a style tree, resolved.
    pub fn style_dirs(&self, tree: &StyleTreeConfig) -> (PathBuf, PathBuf) {
        (self.resolve_path(&tree.src), self.resolve_path(&tree.out))
    }
}
