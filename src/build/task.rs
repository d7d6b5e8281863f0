//! Build task definitions.
//!
//! A task is one independently invocable unit of the pipeline: color
//! extraction, one style tree, the script tree, or a scaffolder.

use std::fmt;

/// Every task the pipeline can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum TaskKind {
    /// Generate the SCSS color map from theme.json
    #[value(name = "colors")]
    Colors,
    /// Compile global theme styles
    #[value(name = "styles")]
    Styles,
    /// Compile per-block styles
    #[value(name = "blocks")]
    Blocks,
    /// Compile registered block style variants
    #[value(name = "block-styles")]
    BlockStyles,
    /// Compile core block overrides
    #[value(name = "core-block-styles")]
    CoreBlockStyles,
    /// Compile block variation styles
    #[value(name = "variations")]
    Variations,
    /// Minify scripts
    #[value(name = "scripts")]
    Scripts,
    /// Scaffold missing block style sources
    #[value(name = "scaffold-block-styles")]
    ScaffoldBlockStyles,
    /// Scaffold missing post type directories
    #[value(name = "scaffold-posttypes")]
    ScaffoldPostTypes,
}

impl TaskKind {
    /// All tasks, in listing order.
    pub const ALL: [TaskKind; 9] = [
        TaskKind::Colors,
        TaskKind::Styles,
        TaskKind::Blocks,
        TaskKind::BlockStyles,
        TaskKind::CoreBlockStyles,
        TaskKind::Variations,
        TaskKind::Scripts,
        TaskKind::ScaffoldBlockStyles,
        TaskKind::ScaffoldPostTypes,
    ];

    /// The SCSS compile tasks.
    pub const STYLES: [TaskKind; 5] = [
        TaskKind::Styles,
        TaskKind::Blocks,
        TaskKind::BlockStyles,
        TaskKind::CoreBlockStyles,
        TaskKind::Variations,
    ];

    /// Tasks run concurrently by `build` once colors are generated.
    pub const COMPILE: [TaskKind; 6] = [
        TaskKind::Styles,
        TaskKind::Blocks,
        TaskKind::BlockStyles,
        TaskKind::CoreBlockStyles,
        TaskKind::Variations,
        TaskKind::Scripts,
    ];

    /// Command-line name of the task.
    pub fn name(self) -> &'static str {
        match self {
            TaskKind::Colors => "colors",
            TaskKind::Styles => "styles",
            TaskKind::Blocks => "blocks",
            TaskKind::BlockStyles => "block-styles",
            TaskKind::CoreBlockStyles => "core-block-styles",
            TaskKind::Variations => "variations",
            TaskKind::Scripts => "scripts",
            TaskKind::ScaffoldBlockStyles => "scaffold-block-styles",
            TaskKind::ScaffoldPostTypes => "scaffold-posttypes",
        }
    }

    /// One-line description for `porter tasks`.
    pub fn description(self) -> &'static str {
        match self {
            TaskKind::Colors => "Generate the SCSS color map from the theme palette",
            TaskKind::Styles => "Compile global theme styles",
            TaskKind::Blocks => "Compile per-block styles",
            TaskKind::BlockStyles => "Compile registered block style variants",
            TaskKind::CoreBlockStyles => "Compile core block overrides",
            TaskKind::Variations => "Compile block variation styles",
            TaskKind::Scripts => "Minify scripts",
            TaskKind::ScaffoldBlockStyles => "Create missing block style sources",
            TaskKind::ScaffoldPostTypes => "Create missing post type directories",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
