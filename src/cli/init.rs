//! Init command: write a starter skyburst.toml

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::loader::write_default_config;
use crate::config::ConfigError;

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the init command
pub fn run_init(path: Option<&Path>, force: bool) -> ExitCode {
    let dir = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    match write_default_config(&dir, force) {
        Ok(config_path) => {
            println!("Created {}", config_path.display());
            println!();
            println!("Next steps:");
            println!("  skyburst render            # writes fireworks.gif");
            println!("  skyburst preview --frame 30");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e @ ConfigError::AlreadyExists(_)) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            eprintln!("Error: Failed to write skyburst.toml in '{}': {}", dir.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
