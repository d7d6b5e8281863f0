//! Color map generation from the theme palette
//!
//! Projects `settings.color.palette` from the theme descriptor into a SCSS
//! map so stylesheets can use the same tokens the block editor exposes:
//!
//! ```text
//! $colors: ("primary": #123456, "accent": #abcdef);
//! ```

use crate::descriptor::{self, DescriptorError, PaletteEntry, ThemeDescriptor};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error during color extraction
#[derive(Debug, Error)]
pub enum ColorError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Render palette entries as a SCSS `$colors` map.
pub fn render_color_map(palette: &[PaletteEntry]) -> String {
    let entries: Vec<String> =
        palette.iter().map(|e| format!("\"{}\": {}", e.slug, e.color)).collect();
    format!("$colors: ({});", entries.join(", "))
}

/// Read the theme descriptor at `theme` and overwrite `output` with its color map.
///
/// Returns the number of palette entries written.
pub fn extract_colors(theme: &Path, output: &Path) -> Result<usize, ColorError> {
    let descriptor: ThemeDescriptor = descriptor::load(theme)?;
    let map = render_color_map(descriptor.palette());

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| ColorError::Write { path: parent.to_path_buf(), source })?;
    }
    fs::write(output, map).map_err(|source| ColorError::Write { path: output.to_path_buf(), source })?;

    Ok(descriptor.palette().len())
}
