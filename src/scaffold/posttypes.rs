//! Custom post type directory scaffolding.

use super::{ScaffoldError, ScaffoldReport};
use crate::descriptor::{self, PostTypeRegistry};
use std::fs;
use std::path::{Component, Path};
use tracing::debug;

/// Menu icon written into each new post type directory.
pub const DEFAULT_ICON: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 20">"##,
    r##"<path fill="#ffffff" d="M4 1h8l4 4v14H4z M12 1v4h4"/>"##,
    r##"<path fill="none" stroke="#ffffff" stroke-width="1.5" d="M7 10h6M7 13h6M7 16h4"/>"##,
    "</svg>",
);

/// File name of the icon inside a post type directory
pub const ICON_FILE: &str = "icon.svg";

fn check_identifier(id: &str) -> Result<(), ScaffoldError> {
    let mut components = Path::new(id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ScaffoldError::InvalidPostType(id.to_string())),
    }
}

/// Create `<dir>/<identifier>/icon.svg` for every post type whose directory
/// does not exist yet.
///
/// Only the directory is checked: an existing directory, even an empty one,
/// suppresses the icon.
pub fn scaffold_posttypes(registry: &Path, dir: &Path) -> Result<ScaffoldReport, ScaffoldError> {
    let registry: PostTypeRegistry = descriptor::load(registry)?;
    let identifiers: Vec<&str> = registry.identifiers().collect();
    for id in &identifiers {
        check_identifier(id)?;
    }

    let mut report = ScaffoldReport::default();
    for id in identifiers {
        let type_dir = dir.join(id);
        if type_dir.exists() {
            report.existing += 1;
            continue;
        }

        fs::create_dir_all(&type_dir)
            .map_err(|source| ScaffoldError::CreateDir { path: type_dir.clone(), source })?;
        let icon = type_dir.join(ICON_FILE);
        fs::write(&icon, DEFAULT_ICON)
            .map_err(|source| ScaffoldError::WriteFile { path: icon.clone(), source })?;

        debug!(post_type = id, path = %icon.display(), "scaffolded post type");
        report.created.push(icon);
    }

    Ok(report)
}
