//! Skyburst - Command-line tool for rendering procedural fireworks

use std::process::ExitCode;

use skyburst::cli;

fn main() -> ExitCode {
    cli::run()
}
