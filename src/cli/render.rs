//! Render command implementation

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::firework::BurstKind;
use crate::output::{open_sink, OutputError};
use crate::simulation::{RunSummary, Simulation};

use super::{config_error_exit, ShowArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// JSON report printed by `render --json`
#[derive(Debug, Serialize)]
struct RenderReport {
    output: PathBuf,
    width: u32,
    height: u32,
    fps: u32,
    seed: Option<u64>,
    kinds: Vec<BurstKind>,
    #[serde(flatten)]
    summary: RunSummary,
}

/// Execute the render command
pub fn run_render(output: Option<&Path>, show: &ShowArgs, json: bool) -> ExitCode {
    let config = match show.resolve(output) {
        Ok(c) => c,
        Err(e) => return config_error_exit(&e),
    };

    let sim_config = config.simulation();
    let output_path = config.video.output.clone();

    let mut sink =
        match open_sink(&output_path, sim_config.fps, sim_config.width, sim_config.height) {
            Ok(s) => s,
            Err(e @ OutputError::UnsupportedFormat { .. }) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        };

    let summary = match Simulation::new(sim_config.clone()).run(sink.as_mut()) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: Failed to render '{}': {}", output_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        let report = RenderReport {
            output: output_path,
            width: sim_config.width,
            height: sim_config.height,
            fps: sim_config.fps,
            seed: sim_config.seed,
            kinds: sim_config.kinds,
            summary,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        println!("Saved: {}", output_path.display());
    }

    ExitCode::from(EXIT_SUCCESS)
}
