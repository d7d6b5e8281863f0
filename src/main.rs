//! Porter - command-line asset pipeline for WordPress themes

use std::process::ExitCode;

use porter::cli;

fn main() -> ExitCode {
    cli::run()
}
