//! Preview command: render a single frame of a show to PNG

use std::path::Path;
use std::process::ExitCode;

use crate::output::save_png;
use crate::simulation::Simulation;

use super::{config_error_exit, ShowArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the preview command
pub fn run_preview(frame: u32, output: &Path, show: &ShowArgs) -> ExitCode {
    let config = match show.resolve(None) {
        Ok(c) => c,
        Err(e) => return config_error_exit(&e),
    };

    let mut sim = Simulation::new(config.simulation());
    let total = sim.total_frames();
    if frame >= total {
        eprintln!("Error: Frame {} is out of range (the show has {} frames)", frame, total);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    // Earlier frames still have to be simulated; only the last one is kept
    let mut image = None;
    for _ in 0..=frame {
        image = sim.step();
    }
    let Some(image) = image else {
        eprintln!("Error: Frame {} was not produced", frame);
        return ExitCode::from(EXIT_ERROR);
    };

    if let Err(e) = save_png(&image, output) {
        eprintln!("Error: Failed to save '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {}", output.display());
    ExitCode::from(EXIT_SUCCESS)
}
