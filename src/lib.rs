//! Porter - asset build pipeline for WordPress themes
//!
//! This library provides functionality to:
//! - Extract the theme color palette into a SCSS map
//! - Compile SCSS trees to prefixed, minified CSS and minify scripts
//! - Scaffold block style sources and custom post type directories
//! - Rebuild affected outputs when sources change

pub mod build;
pub mod cli;
pub mod colors;
pub mod config;
pub mod descriptor;
pub mod naming;
pub mod scaffold;
pub mod watch;
