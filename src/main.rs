//! Bandpaint - Command-line tool for rendering 16-color scenes and animating sprites over them

use std::process::ExitCode;

use bandpaint::cli;

fn main() -> ExitCode {
    cli::run()
}
