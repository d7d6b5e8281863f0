//! JSON descriptors read by the pipeline
//!
//! Three documents drive the generative tasks: the theme descriptor
//! (`theme.json`) with its color palette, the block style registry and the
//! custom post type registry. All are read-only inputs; a missing or
//! malformed descriptor is fatal for the task that reads it.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error loading a descriptor
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON or does not match the schema
    #[error("Invalid descriptor {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A single palette entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaletteEntry {
    pub slug: String,
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ColorSettings {
    palette: Vec<PaletteEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ThemeSettings {
    color: ColorSettings,
}

/// `theme.json`: `{ settings: { color: { palette: [...] } } }`
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeDescriptor {
    settings: ThemeSettings,
}

impl ThemeDescriptor {
    /// Palette entries in declaration order.
    pub fn palette(&self) -> &[PaletteEntry] {
        &self.settings.color.palette
    }
}

#[derive(Debug, Clone, Deserialize)]
struct BlocksSection {
    styles: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

/// `blocks.json`: `{ blocks: { styles: { "<ns>/<block>": { "<style>": ... } } } }`
#[derive(Debug, Clone, Deserialize)]
pub struct BlockStyleRegistry {
    blocks: BlocksSection,
}

impl BlockStyleRegistry {
    /// Every `(block identifier, style name)` pair in the registry.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.blocks
            .styles
            .iter()
            .flat_map(|(block, styles)| styles.keys().map(move |s| (block.as_str(), s.as_str())))
    }
}

/// `posttypes.json`: `{ posttypes: { "<identifier>": { ... } } }`
#[derive(Debug, Clone, Deserialize)]
pub struct PostTypeRegistry {
    posttypes: BTreeMap<String, serde_json::Value>,
}

impl PostTypeRegistry {
    /// Registered post type identifiers.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.posttypes.keys().map(String::as_str)
    }
}

/// Read and deserialize a JSON descriptor.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, DescriptorError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| DescriptorError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&contents)
        .map_err(|source| DescriptorError::Parse { path: path.to_path_buf(), source })
}
