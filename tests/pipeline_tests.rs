//! Pipeline integration tests
//!
//! Drives the library against complete theme trees in temporary
//! directories. Covers:
//!
//! - Color map generation
//! - Block style and post type scaffolding
//! - Style tree compilation and output paths
//! - Script minification
//! - Full build ordering and failure isolation

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use porter::build::{BuildContext, Pipeline, TaskKind, TaskStatus};
use porter::config::{load_project, PorterConfig};

// ============================================================================
// Test Utilities
// ============================================================================

const THEME: &str = r##"{
    "version": 2,
    "settings": {
        "color": {
            "palette": [
                { "slug": "primary", "color": "#0000ff", "name": "Primary" },
                { "slug": "contrast", "color": "#111111", "name": "Contrast" }
            ]
        }
    }
}"##;

/// Create a file under the theme root, with parents.
fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

fn pipeline(root: &Path) -> Pipeline {
    Pipeline::new(BuildContext::new(PorterConfig::default(), root.to_path_buf()))
}

/// A theme with every source tree populated.
fn full_theme() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write(root, "theme.json", THEME);
    write(root, "assets/src/scss/_variables.scss", "$gap: 1rem;\n");
    write(
        root,
        "assets/src/scss/main.scss",
        "@import 'variables';\n@import 'colors';\n\
         .site { padding: $gap; color: map-get($colors, \"primary\"); }\n",
    );
    write(root, "assets/src/scss/admin/editor.scss", ".editor { margin: 0 auto; }\n");
    write(root, "porter/blocks/hero/scss/style.scss", ".hero { .title { font-weight: 700; } }\n");
    write(root, "porter/inc/block/core/styles/scss/core_button.scss", ".wp-block-button { gap: 0; }\n");
    write(
        root,
        "porter/inc/block/variations/group/scss/card.scss",
        ".is-card { border-radius: 4px; }\n",
    );
    write(root, "assets/src/js/main.js", "// entry\nfunction boot() {\n    return 42;\n}\n");
    write(
        root,
        "porter/config/blocks.json",
        r#"{"blocks": {"styles": {"core/image": {"rounded": {}}, "acf/hero": {"dark": {}}}}}"#,
    );
    write(root, "porter/config/posttypes.json", r#"{"posttypes": {"event": {}, "team-member": {}}}"#);

    temp
}

// ============================================================================
// Colors
// ============================================================================

#[test]
fn test_colors_written_in_palette_order() {
    let temp = full_theme();
    pipeline(temp.path()).run_task(TaskKind::Colors).unwrap();

    assert_eq!(
        read(temp.path(), "assets/src/scss/_colors.scss"),
        r#"$colors: ("primary": #0000ff, "contrast": #111111);"#
    );
}

#[test]
fn test_colors_empty_palette() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "theme.json", r#"{"settings": {"color": {"palette": []}}}"#);

    pipeline(temp.path()).run_task(TaskKind::Colors).unwrap();
    assert_eq!(read(temp.path(), "assets/src/scss/_colors.scss"), "$colors: ();");
}

#[test]
fn test_colors_overwrites_previous_map() {
    let temp = full_theme();
    write(temp.path(), "assets/src/scss/_colors.scss", "$colors: (\"stale\": #000000, \"old\": #ffffff);");

    pipeline(temp.path()).run_task(TaskKind::Colors).unwrap();
    assert!(!read(temp.path(), "assets/src/scss/_colors.scss").contains("stale"));
}

#[test]
fn test_colors_malformed_theme_is_fatal() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "theme.json", "{ not json");

    assert!(pipeline(temp.path()).run_task(TaskKind::Colors).is_err());
    assert!(!temp.path().join("assets/src/scss/_colors.scss").exists());
}

// ============================================================================
// Scaffolding
// ============================================================================

#[test]
fn test_scaffold_block_styles_contents() {
    let temp = full_theme();
    let result = pipeline(temp.path()).run_task(TaskKind::ScaffoldBlockStyles).unwrap();
    assert_eq!(result.outputs.len(), 2);

    let image = read(temp.path(), "porter/inc/block/styles/scss/core_image--rounded.scss");
    assert!(image.starts_with("@import '../../../../../assets/src/scss/variables';\n"));
    assert!(image.contains(".wp-block-image.is-style-rounded {"));

    let hero = read(temp.path(), "porter/inc/block/styles/scss/acf_hero--dark.scss");
    assert!(hero.contains(".wp-block-acf-hero.is-style-dark {"));
}

#[test]
fn test_scaffold_block_styles_twice_writes_once() {
    let temp = full_theme();
    let pipeline = pipeline(temp.path());

    pipeline.run_task(TaskKind::ScaffoldBlockStyles).unwrap();
    let path = temp.path().join("porter/inc/block/styles/scss/core_image--rounded.scss");
    fs::write(&path, "// hand-written\n").unwrap();

    let second = pipeline.run_task(TaskKind::ScaffoldBlockStyles).unwrap();
    assert!(second.outputs.is_empty());
    assert_eq!(fs::read_to_string(path).unwrap(), "// hand-written\n");
}

#[test]
fn test_scaffold_posttypes_then_rerun() {
    let temp = full_theme();
    let pipeline = pipeline(temp.path());

    let first = pipeline.run_task(TaskKind::ScaffoldPostTypes).unwrap();
    assert_eq!(first.outputs.len(), 2);
    assert!(temp.path().join("porter/inc/posttypes/event/icon.svg").is_file());
    assert!(temp.path().join("porter/inc/posttypes/team-member/icon.svg").is_file());

    fs::remove_file(temp.path().join("porter/inc/posttypes/event/icon.svg")).unwrap();
    let second = pipeline.run_task(TaskKind::ScaffoldPostTypes).unwrap();
    assert!(second.outputs.is_empty());
    assert!(!temp.path().join("porter/inc/posttypes/event/icon.svg").exists());
}

// ============================================================================
// Compilation
// ============================================================================

#[test]
fn test_every_style_task_skips_absent_source() {
    let temp = TempDir::new().unwrap();
    let pipeline = pipeline(temp.path());

    for task in TaskKind::STYLES.into_iter().chain([TaskKind::Scripts]) {
        let result = pipeline.run_task(task).unwrap();
        assert_eq!(result.status, TaskStatus::Skipped, "{}", task);
    }
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_build_writes_expected_outputs() {
    let temp = full_theme();
    let result = pipeline(temp.path()).build();

    assert!(result.is_success(), "{}", result.summary());
    assert!(result.file_errors().is_empty());

    for rel in [
        "assets/src/scss/_colors.scss",
        "assets/dist/css/main.min.css",
        "assets/dist/css/admin/editor.min.css",
        "porter/blocks/hero/css/style.css",
        "porter/inc/block/core/styles/css/core_button.css",
        "porter/inc/block/variations/group/css/card.css",
        "assets/dist/js/main.js",
    ] {
        assert!(temp.path().join(rel).is_file(), "missing {}", rel);
    }

    // Partials are never compiled standalone
    assert!(!temp.path().join("assets/dist/css/_variables.min.css").exists());
    // Scaffolders are not part of the build
    assert!(!temp.path().join("porter/inc/posttypes").exists());
}

#[test]
fn test_build_uses_freshly_generated_colors() {
    let temp = full_theme();
    pipeline(temp.path()).build();

    let css = read(temp.path(), "assets/dist/css/main.min.css");
    assert!(css.contains(".site{"), "{}", css);
    assert!(css.contains("padding:1rem"), "{}", css);
    assert!(css.contains("color:#00f") || css.contains("color:blue"), "{}", css);
}

#[test]
fn test_block_compile_nests_and_minifies() {
    let temp = full_theme();
    pipeline(temp.path()).run_task(TaskKind::Blocks).unwrap();

    assert_eq!(read(temp.path(), "porter/blocks/hero/css/style.css"), ".hero .title{font-weight:700}");
}

#[test]
fn test_scaffolded_block_styles_compile() {
    let temp = full_theme();
    let pipeline = pipeline(temp.path());

    let result = pipeline.run_series(&[TaskKind::ScaffoldBlockStyles, TaskKind::BlockStyles]);
    assert!(result.is_success(), "{}", result.summary());

    // Empty rules compile to nothing but the file is still written
    assert!(temp.path().join("porter/inc/block/styles/css/core_image--rounded.css").is_file());
    assert!(temp.path().join("porter/inc/block/styles/css/acf_hero--dark.css").is_file());
}

#[test]
fn test_broken_file_does_not_stop_tree() {
    let temp = full_theme();
    write(temp.path(), "assets/src/scss/broken.scss", ".oops { color: ");

    let result = pipeline(temp.path()).build();

    // Per-file errors do not fail the build
    assert!(result.is_success());
    let styles = result.get(TaskKind::Styles).unwrap();
    assert_eq!(styles.file_errors.len(), 1);
    assert!(styles.file_errors[0].file.ends_with("broken.scss"));
    assert!(temp.path().join("assets/dist/css/main.min.css").is_file());
    assert!(!temp.path().join("assets/dist/css/broken.min.css").exists());
}

#[test]
fn test_global_styles_line_length_limited() {
    let temp = TempDir::new().unwrap();
    let rules: String =
        (0..20).map(|i| format!(".rule-number-{} {{ margin-top: {}px; }}\n", i, i + 1)).collect();
    write(temp.path(), "assets/src/scss/long.scss", &rules);

    pipeline(temp.path()).run_task(TaskKind::Styles).unwrap();

    let css = read(temp.path(), "assets/dist/css/long.min.css");
    assert!(css.lines().count() > 1);
    for line in css.lines() {
        // A line only ends once it passes the limit, and each rule is short
        assert!(line.len() <= 80 + 40, "line too long: {}", line);
    }
}

#[test]
fn test_block_styles_without_line_limit_stay_single_line() {
    let temp = TempDir::new().unwrap();
    let rules: String =
        (0..20).map(|i| format!(".rule-number-{} {{ margin-top: {}px; }}\n", i, i + 1)).collect();
    write(temp.path(), "porter/blocks/long/scss/style.scss", &rules);

    pipeline(temp.path()).run_task(TaskKind::Blocks).unwrap();

    assert_eq!(read(temp.path(), "porter/blocks/long/css/style.css").lines().count(), 1);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_configured_paths_are_honored() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "porter.toml",
        r#"
        [paths]
        theme = "config/theme.json"
        colors = "src/styles/_palette.scss"

        [styles.global]
        src = "src/styles"
        pattern = "*.scss"
        out = "public/css"
        rename = { rule = "suffix", suffix = "" }
        "#,
    );
    write(temp.path(), "config/theme.json", THEME);
    write(temp.path(), "src/styles/site.scss", "@import 'palette';\n.a { color: map-get($colors, \"contrast\"); }\n");

    let loaded = load_project(None, Some(temp.path())).unwrap();
    assert_eq!(loaded.source, Some(temp.path().join("porter.toml")));

    let pipeline = Pipeline::new(BuildContext::new(loaded.config, loaded.root));
    let result = pipeline.run_series(&[TaskKind::Colors, TaskKind::Styles]);

    assert!(result.is_success(), "{}", result.summary());
    assert!(temp.path().join("src/styles/_palette.scss").is_file());
    assert_eq!(read(temp.path(), "public/css/site.css"), ".a{color:#111}");
}
