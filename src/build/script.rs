//! JavaScript minification.
//!
//! Every script under the source directory is minified on its own and
//! written to the same relative path under the output directory. There is
//! no bundling or module resolution.
//!
//! Sources are parsed as classic scripts, then compressed and printed with
//! local identifiers mangled. Top-level names stay untouched since they are
//! globals shared with other scripts on the page. A file that fails to parse
//! is reported and produces no output.

use crate::build::discovery::{discover_files, DiscoveryError};
use crate::build::{BuildContext, FileError};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_mangler::MangleOptions;
use oxc_minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Minify JavaScript source text.
///
/// Returns the parser's diagnostics, joined, when the source is not valid
/// script syntax.
pub fn minify_script(source: &str) -> Result<String, String> {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(false);

    let parsed = Parser::new(&allocator, source, source_type).parse();
    if !parsed.errors.is_empty() {
        let messages: Vec<String> = parsed.errors.iter().map(|e| e.to_string()).collect();
        return Err(messages.join("; "));
    }

    let mut program = parsed.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::default()),
    };
    let minified = Minifier::new(options).build(&allocator, &mut program);

    let printed = Codegen::new()
        .with_options(CodegenOptions::minify())
        .with_scoping(minified.scoping)
        .build(&program);
    Ok(printed.code)
}

/// Minifier for the script tree.
pub struct ScriptBundler {
    src_dir: PathBuf,
    out_dir: PathBuf,
    pattern: String,
}

/// Outcome of minifying a script tree whose source directory exists.
#[derive(Debug, Default)]
pub struct ScriptOutput {
    pub written: Vec<PathBuf>,
    pub errors: Vec<FileError>,
}

impl ScriptBundler {
    pub fn new(context: &BuildContext) -> Self {
        let scripts = &context.config().scripts;
        Self {
            src_dir: context.resolve_path(&scripts.src),
            out_dir: context.resolve_path(&scripts.out),
            pattern: scripts.pattern.clone(),
        }
    }

    pub fn output_path(&self, relative: &Path) -> PathBuf {
        self.out_dir.join(relative)
    }

    /// Minify the tree. Returns `None` when the source directory is absent.
    pub fn run(&self) -> Result<Option<ScriptOutput>, DiscoveryError> {
        if !self.src_dir.is_dir() {
            debug!(src = %self.src_dir.display(), "source directory does not exist, skipping");
            return Ok(None);
        }

        let mut output = ScriptOutput::default();
        for source in discover_files(&self.src_dir, &self.pattern)? {
            let target = self.output_path(&source.relative);
            match minify_file(&source.path, &target) {
                Ok(()) => {
                    debug!(from = %source.path.display(), to = %target.display(), "minified");
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

fn minify_file(source: &Path, target: &Path) -> Result<(), String> {
    let code = fs::read_to_string(source).map_err(|e| format!("failed to read: {}", e))?;
    let minified = minify_script(&code)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create {}: {}", parent.display(), e))?;
    }
    fs::write(target, minified).map_err(|e| format!("failed to write {}: {}", target.display(), e))
}
