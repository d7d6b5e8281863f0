//! SCSS compilation.
//!
//! Each style tree is compiled file by file:
//!
//! 1. SCSS to compressed CSS with `grass`
//! 2. Vendor prefixing and minification for the configured browsers with
//!    `lightningcss`
//! 3. Optionally, line-length limiting (a line break after the first `}`
//!    past the limit)
//!
//! A file that fails any step is reported and produces no output; the
//! rest of the tree is still compiled.

use crate::build::discovery::{discover_stylesheets, DiscoveryError};
use crate::build::{BuildContext, FileError};
use crate::config::{parse_browser_version, BrowserTargets, StyleTreeConfig};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Convert configured browser versions into lightningcss targets.
///
/// Versions are validated when the config is loaded; any that still fail to
/// parse are left untargeted.
pub fn browser_targets(config: &BrowserTargets) -> Targets {
    let version = |v: &Option<String>| v.as_deref().and_then(parse_browser_version);
    let browsers = Browsers {
        android: version(&config.android),
        chrome: version(&config.chrome),
        edge: version(&config.edge),
        firefox: version(&config.firefox),
        ie: version(&config.ie),
        ios_saf: version(&config.ios_saf),
        opera: version(&config.opera),
        safari: version(&config.safari),
        samsung: version(&config.samsung),
    };
    Targets { browsers: Some(browsers), ..Targets::default() }
}

/// Prefix and minify plain CSS for the given targets.
pub fn prefix_and_minify(css: &str, filename: &str, targets: Targets) -> Result<String, String> {
    let options = ParserOptions { filename: filename.to_string(), ..ParserOptions::default() };
    let mut sheet = StyleSheet::parse(css, options).map_err(|e| e.to_string())?;
    sheet
        .minify(MinifyOptions { targets, ..MinifyOptions::default() })
        .map_err(|e| e.to_string())?;
    let output = sheet
        .to_css(PrinterOptions { minify: true, targets, ..PrinterOptions::default() })
        .map_err(|e| e.to_string())?;
    Ok(output.code)
}

/// Break a line after every `}` that ends past `max_len` characters.
pub fn limit_line_length(css: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(css.len() + css.len() / max_len.max(1));
    let mut line_len = 0;

    for c in css.chars() {
        out.push(c);
        line_len += 1;
        if c == '\n' {
            line_len = 0;
        } else if c == '}' && line_len > max_len {
            out.push('\n');
            line_len = 0;
        }
    }

    if out.ends_with('\n') && !css.ends_with('\n') {
        out.pop();
    }
    out
}

/// Compiler for one style tree.
pub struct StyleCompiler<'a> {
    tree: &'a StyleTreeConfig,
    src_dir: PathBuf,
    out_dir: PathBuf,
    targets: Targets,
    max_line_len: usize,
}

/// Outcome of compiling a tree whose source directory exists.
#[derive(Debug, Default)]
pub struct StyleOutput {
    pub written: Vec<PathBuf>,
    pub errors: Vec<FileError>,
}

impl<'a> StyleCompiler<'a> {
    pub fn new(context: &BuildContext, tree: &'a StyleTreeConfig) -> Self {
        let (src_dir, out_dir) = context.style_dirs(tree);
        let styles = &context.config().styles;
        Self {
            tree,
            src_dir,
            out_dir,
            targets: browser_targets(&styles.browsers),
            max_line_len: styles.max_line_len,
        }
    }

    /// Output path for a source path relative to the source directory.
    pub fn output_path(&self, relative: &Path) -> PathBuf {
        self.out_dir.join(self.tree.rename.apply(relative, "css"))
    }

    /// Compile one SCSS file to its final CSS text.
    pub fn compile_file(&self, path: &Path) -> Result<String, String> {
        let options = grass::Options::default().style(grass::OutputStyle::Compressed);
        let css = grass::from_path(path, &options).map_err(|e| e.to_string())?;
        let css = prefix_and_minify(&css, &path.to_string_lossy(), self.targets)?;

        if self.tree.limit_lines {
            Ok(limit_line_length(&css, self.max_line_len))
        } else {
            Ok(css)
        }
    }

    /// Compile the tree. Returns `None` when the source directory is absent.
    pub fn run(&self) -> Result<Option<StyleOutput>, DiscoveryError> {
        if !self.src_dir.is_dir() {
            debug!(src = %self.src_dir.display(), "source directory does not exist, skipping");
            return Ok(None);
        }

        let mut output = StyleOutput::default();
        for source in discover_stylesheets(&self.src_dir, &self.tree.pattern)? {
            let target = self.output_path(&source.relative);
            match self.compile_file(&source.path).and_then(|css| write_output(&target, &css)) {
                Ok(()) => {
                    debug!(from = %source.path.display(), to = %target.display(), "compiled");
                    output.written.push(target);
                }
                Err(message) => {
                    error!(file = %source.path.display(), "{}", message);
                    output.errors.push(FileError::new(source.path, message));
                }
            }
        }

        Ok(Some(output))
    }
}

fn write_output(target: &Path, contents: &str) -> Result<(), String> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create {}: {}", parent.display(), e))?;
    }
    fs::write(target, contents).map_err(|e| format!("failed to write {}: {}", target.display(), e))
}
