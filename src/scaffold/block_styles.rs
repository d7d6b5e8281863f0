//! Block style source scaffolding.
//!
//! Every `(block, style)` pair in `blocks.json` gets a SCSS file named
//! `<namespace>_<block>--<style>.scss` containing an empty rule for the
//! style's selector.

use super::{ScaffoldError, ScaffoldReport};
use crate::descriptor::{self, BlockStyleRegistry};
use crate::naming::kebab_case;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::debug;

/// Namespace of WordPress core blocks, whose classes omit the namespace.
const CORE_NAMESPACE: &str = "core";

/// A registered style variant of one block, with case-folded segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStyle {
    pub namespace: String,
    pub block: String,
    pub style: String,
}

impl BlockStyle {
    /// Build from a `<namespace>/<block>` identifier and a style name.
    ///
    /// Segments after the block name are ignored, so `acme/hero/legacy`
    /// names the `acme/hero` block.
    pub fn new(identifier: &str, style: &str) -> Result<Self, ScaffoldError> {
        let invalid = || ScaffoldError::InvalidBlockName(identifier.to_string());
        let mut segments = identifier.split('/');
        let namespace = segments.next().ok_or_else(invalid)?;
        let block = segments.next().ok_or_else(invalid)?;

        let namespace = kebab_case(namespace);
        let block = kebab_case(block);
        let style = kebab_case(style);
        if namespace.is_empty() || block.is_empty() || style.is_empty() {
            return Err(invalid());
        }

        Ok(Self { namespace, block, style })
    }

    /// `core_image--rounded.scss`
    pub fn file_name(&self) -> String {
        format!("{}_{}--{}.scss", self.namespace, self.block, self.style)
    }

    /// `.wp-block-image.is-style-rounded` for core blocks,
    /// `.wp-block-acf-hero.is-style-dark` otherwise.
    pub fn selector(&self) -> String {
        if self.namespace == CORE_NAMESPACE {
            format!(".wp-block-{}.is-style-{}", self.block, self.style)
        } else {
            format!(".wp-block-{}-{}.is-style-{}", self.namespace, self.block, self.style)
        }
    }

    /// Placeholder source for this style.
    pub fn render(&self, variables_import: &str) -> String {
        format!(
            "@import '{}';\n\n{} {{\n    // Add your CSS rules here\n}}\n",
            variables_import,
            self.selector()
        )
    }
}

/// Create a source file in `dir` for every registered style that has none.
pub fn scaffold_block_styles(
    registry: &Path,
    dir: &Path,
    variables_import: &str,
) -> Result<ScaffoldReport, ScaffoldError> {
    let registry: BlockStyleRegistry = descriptor::load(registry)?;
    let styles = registry
        .pairs()
        .map(|(block, style)| BlockStyle::new(block, style))
        .collect::<Result<Vec<_>, _>>()?;

    let mut report = ScaffoldReport::default();
    if styles.is_empty() {
        return Ok(report);
    }

    fs::create_dir_all(dir)
        .map_err(|source| ScaffoldError::CreateDir { path: dir.to_path_buf(), source })?;

    for style in styles {
        let path = dir.join(style.file_name());
        if path.exists() {
            report.existing += 1;
            continue;
        }

        // create_new keeps a file that appeared since the check intact
        let file = OpenOptions::new().write(true).create_new(true).open(&path);
        let mut file = match file {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                report.existing += 1;
                continue;
            }
            Err(source) => return Err(ScaffoldError::WriteFile { path, source }),
        };
        file.write_all(style.render(variables_import).as_bytes())
            .map_err(|source| ScaffoldError::WriteFile { path: path.clone(), source })?;

        debug!(path = %path.display(), "scaffolded block style");
        report.created.push(path);
    }

    Ok(report)
}
