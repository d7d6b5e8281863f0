//! Configuration schema types for `porter.toml`
//!
//! Defines the structure and validation rules for the theme build
//! configuration. Every field has a default matching the stock theme
//! layout, so an empty (or absent) `porter.toml` is a valid config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Descriptor and generated-file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Theme descriptor holding the color palette
    pub theme: PathBuf,
    /// Generated SCSS color map
    pub colors: PathBuf,
    /// Block style registry
    pub blocks: PathBuf,
    /// Custom post type registry
    pub posttypes: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            theme: PathBuf::from("theme.json"),
            colors: PathBuf::from("assets/src/scss/_colors.scss"),
            blocks: PathBuf::from("porter/config/blocks.json"),
            posttypes: PathBuf::from("porter/config/posttypes.json"),
        }
    }
}

/// Scaffold output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Directory receiving scaffolded block style sources
    pub block_styles_dir: PathBuf,
    /// Import written at the top of each scaffolded block style
    pub variables_import: String,
    /// Directory receiving one subdirectory per post type
    pub posttypes_dir: PathBuf,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            block_styles_dir: PathBuf::from("porter/inc/block/styles/scss"),
            variables_import: "../../../../../assets/src/scss/variables".to_string(),
            posttypes_dir: PathBuf::from("porter/inc/posttypes"),
        }
    }
}

/// How a compiled file's path is derived from its source path.
///
/// The rule is applied to the path relative to the tree's source
/// directory; the result is joined onto the tree's output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum RenameRule {
    /// Insert a suffix before the extension (`main.scss` -> `main.min.css`)
    Suffix { suffix: String },
    /// Swap one directory segment (`hero/scss/a.scss` -> `hero/css/a.css`)
    ReplaceDir { from: String, to: String },
    /// Put every file in one directory (`a.scss` -> `css/a.css`)
    FixedDir { dir: String },
}

impl RenameRule {
    /// Map a source path (relative to the source dir) to its output path
    /// (relative to the output dir). The extension always becomes `ext`.
    pub fn apply(&self, relative: &Path, ext: &str) -> PathBuf {
        let stem = relative.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let parent = relative.parent().unwrap_or_else(|| Path::new(""));

        match self {
            RenameRule::Suffix { suffix } => parent.join(format!("{}{}.{}", stem, suffix, ext)),
            RenameRule::ReplaceDir { from, to } => {
                let mut segments: Vec<String> =
                    parent.iter().map(|s| s.to_string_lossy().into_owned()).collect();
                if let Some(seg) = segments.iter_mut().rev().find(|s| s.as_str() == from) {
                    *seg = to.clone();
                }
                let mut out: PathBuf = segments.iter().collect();
                out.push(format!("{}.{}", stem, ext));
                out
            }
            RenameRule::FixedDir { dir } => Path::new(dir).join(format!("{}.{}", stem, ext)),
        }
    }
}

/// One SCSS source tree and where its CSS goes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleTreeConfig {
    /// Source directory; the task is skipped when it does not exist
    pub src: PathBuf,
    /// Glob pattern, relative to `src`, selecting files to compile
    pub pattern: String,
    /// Glob pattern, relative to `src`, that triggers a rebuild in watch mode
    #[serde(default)]
    pub watch: Option<String>,
    /// Output directory
    pub out: PathBuf,
    /// Output path derivation
    pub rename: RenameRule,
    /// Apply the line-length limiting pass
    #[serde(default)]
    pub limit_lines: bool,
}

impl StyleTreeConfig {
    fn new(src: &str, pattern: &str, out: &str, rename: RenameRule, limit_lines: bool) -> Self {
        Self {
            src: PathBuf::from(src),
            pattern: pattern.to_string(),
            watch: None,
            out: PathBuf::from(out),
            rename,
            limit_lines,
        }
    }

    fn with_watch(mut self, pattern: &str) -> Self {
        self.watch = Some(pattern.to_string());
        self
    }

    /// Pattern used to match change events, falling back to the build pattern.
    pub fn watch_pattern(&self) -> &str {
        self.watch.as_deref().unwrap_or(&self.pattern)
    }
}

/// Browser versions used for vendor prefixing.
///
/// Versions are `major[.minor[.patch]]` strings; an absent browser is not
/// targeted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserTargets {
    pub android: Option<String>,
    pub chrome: Option<String>,
    pub edge: Option<String>,
    pub firefox: Option<String>,
    pub ie: Option<String>,
    pub ios_saf: Option<String>,
    pub opera: Option<String>,
    pub safari: Option<String>,
    pub samsung: Option<String>,
}

impl BrowserTargets {
    /// Roughly the browserslist `defaults` query at the time of writing.
    pub fn defaults() -> Self {
        Self {
            chrome: Some("109".to_string()),
            edge: Some("109".to_string()),
            firefox: Some("115".to_string()),
            ios_saf: Some("15".to_string()),
            safari: Some("15".to_string()),
            samsung: Some("20".to_string()),
            ..Self::default()
        }
    }

    /// Iterate over `(browser, version)` pairs that are set.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let all = [
            ("android", &self.android),
            ("chrome", &self.chrome),
            ("edge", &self.edge),
            ("firefox", &self.firefox),
            ("ie", &self.ie),
            ("ios_saf", &self.ios_saf),
            ("opera", &self.opera),
            ("safari", &self.safari),
            ("samsung", &self.samsung),
        ];
        all.into_iter().filter_map(|(name, v)| v.as_deref().map(|v| (name, v))).collect()
    }
}

/// Encode a `major[.minor[.patch]]` version the way lightningcss expects
/// (`major << 16 | minor << 8 | patch`).
pub fn parse_browser_version(version: &str) -> Option<u32> {
    let mut parts = version.trim().split('.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = parts.next().map(str::parse::<u32>).transpose().ok()?.unwrap_or(0);
    let patch: u32 = parts.next().map(str::parse::<u32>).transpose().ok()?.unwrap_or(0);
    if parts.next().is_some() || major > 0xFFFF || minor > 0xFF || patch > 0xFF {
        return None;
    }
    Some((major << 16) | (minor << 8) | patch)
}

/// SCSS compilation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Maximum line length for the line-limiting pass
    pub max_line_len: usize,
    /// Vendor prefix targets
    pub browsers: BrowserTargets,
    /// Global theme styles
    pub global: StyleTreeConfig,
    /// Per-block styles
    pub blocks: StyleTreeConfig,
    /// Registered block style variants
    pub block_styles: StyleTreeConfig,
    /// Core block overrides
    pub core_block_styles: StyleTreeConfig,
    /// Block variations
    pub variations: StyleTreeConfig,
}

impl Default for StylesConfig {
    fn default() -> Self {
        let scss_to_css =
            || RenameRule::ReplaceDir { from: "scss".to_string(), to: "css".to_string() };
        let css_dir = || RenameRule::FixedDir { dir: "css".to_string() };

        Self {
            max_line_len: 80,
            browsers: BrowserTargets::defaults(),
            global: StyleTreeConfig::new(
                "assets/src/scss",
                "**/*.scss",
                "assets/dist/css",
                RenameRule::Suffix { suffix: ".min".to_string() },
                true,
            ),
            blocks: StyleTreeConfig::new(
                "porter/blocks",
                "**/scss/*.scss",
                "porter/blocks",
                scss_to_css(),
                false,
            ),
            block_styles: StyleTreeConfig::new(
                "porter/inc/block/styles/scss",
                "*.scss",
                "porter/inc/block/styles",
                css_dir(),
                true,
            )
            .with_watch("**/*.scss"),
            core_block_styles: StyleTreeConfig::new(
                "porter/inc/block/core/styles/scss",
                "*.scss",
                "porter/inc/block/core/styles",
                css_dir(),
                true,
            )
            .with_watch("**/*.scss"),
            variations: StyleTreeConfig::new(
                "porter/inc/block/variations",
                "**/scss/*.scss",
                "porter/inc/block/variations",
                scss_to_css(),
                false,
            ),
        }
    }
}

/// JavaScript minification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Source directory; the task is skipped when it does not exist
    pub src: PathBuf,
    /// Glob pattern relative to `src`
    pub pattern: String,
    /// Output directory (paths mirrored 1:1)
    pub out: PathBuf,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            src: PathBuf::from("assets/src/js"),
            pattern: "**/*.js".to_string(),
            out: PathBuf::from("assets/dist/js"),
        }
    }
}

/// Watch mode configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Serialize overlapping invocations of the same task
    pub exclusive: bool,
}

/// Complete porter.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PorterConfig {
    pub paths: PathsConfig,
    pub scaffold: ScaffoldConfig,
    pub styles: StylesConfig,
    pub scripts: ScriptsConfig,
    pub watch: WatchConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "styles.browsers.chrome")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "porter.toml: '{}' {}", self.field, self.message)
    }
}

impl PorterConfig {
    /// Style trees in task order, paired with their config key.
    pub fn style_trees(&self) -> [(&'static str, &StyleTreeConfig); 5] {
        [
            ("global", &self.styles.global),
            ("blocks", &self.styles.blocks),
            ("block_styles", &self.styles.block_styles),
            ("core_block_styles", &self.styles.core_block_styles),
            ("variations", &self.styles.variations),
        ]
    }

    /// Validate the configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut err = |field: String, message: String| {
            errors.push(ConfigValidationError { field, message });
        };

        let required = [
            ("paths.theme", &self.paths.theme),
            ("paths.colors", &self.paths.colors),
            ("paths.blocks", &self.paths.blocks),
            ("paths.posttypes", &self.paths.posttypes),
            ("scaffold.block_styles_dir", &self.scaffold.block_styles_dir),
            ("scaffold.posttypes_dir", &self.scaffold.posttypes_dir),
            ("scripts.src", &self.scripts.src),
            ("scripts.out", &self.scripts.out),
        ];
        for (field, path) in required {
            if path.as_os_str().is_empty() {
                err(field.to_string(), "must not be empty".to_string());
            }
        }

        if self.styles.max_line_len == 0 {
            err("styles.max_line_len".to_string(), "must be greater than 0".to_string());
        }

        for (browser, version) in self.styles.browsers.entries() {
            if parse_browser_version(version).is_none() {
                err(
                    format!("styles.browsers.{}", browser),
                    format!("has invalid version '{}'", version),
                );
            }
        }

        for (key, tree) in self.style_trees() {
            if tree.src.as_os_str().is_empty() {
                err(format!("styles.{}.src", key), "must not be empty".to_string());
            }
            for (field, pattern) in [("pattern", tree.pattern.as_str()), ("watch", tree.watch_pattern())] {
                if let Err(e) = glob::Pattern::new(pattern) {
                    err(format!("styles.{}.{}", key, field), format!("is not a valid glob: {}", e));
                }
            }
        }

        if let Err(e) = glob::Pattern::new(&self.scripts.pattern) {
            err("scripts.pattern".to_string(), format!("is not a valid glob: {}", e));
        }

        errors
    }
}
