//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod init;
mod preview;
mod render;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{self, CliOverrides, ConfigError, SkyburstConfig};
use crate::firework::BurstKind;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Skyburst - Render procedural fireworks to animated GIF or PNG frames
#[derive(Parser)]
#[command(name = "skyburst")]
#[command(about = "Skyburst - Render procedural fireworks to animated GIF or PNG frames")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate a fireworks show and write every frame
    Render {
        /// Output path: a .gif file, or a directory for numbered PNG frames
        /// (default: video.output from skyburst.toml, else fireworks.gif)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        show: ShowArgs,

        /// Print a JSON run summary instead of the saved path
        #[arg(long)]
        json: bool,
    },
    /// Simulate up to one frame and save it as a PNG
    Preview {
        /// Zero-based index of the frame to save
        #[arg(short, long, default_value = "0")]
        frame: u32,

        /// Output PNG file
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,

        #[command(flatten)]
        show: ShowArgs,
    },
    /// Write a default skyburst.toml
    Init {
        /// Directory to write into (default: current directory)
        path: Option<PathBuf>,

        /// Overwrite an existing skyburst.toml
        #[arg(long)]
        force: bool,
    },
}

/// Simulation settings shared by `render` and `preview`.
///
/// Every flag overrides the matching skyburst.toml value.
#[derive(Args, Debug, Clone, Default)]
pub struct ShowArgs {
    /// Length of the show in seconds
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub duration: Option<u32>,

    /// Frames per second
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: Option<u32>,

    /// Frame width in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Frame height in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Firework density, nominally 1-10 (0 = empty sky, 20+ = a burst every frame)
    #[arg(long)]
    pub intensity: Option<u32>,

    /// Random seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Burst kinds to mix, comma-separated or repeated (default: basic)
    #[arg(long = "kind", value_enum, value_delimiter = ',')]
    pub kinds: Vec<BurstKind>,

    /// Config file (default: nearest skyburst.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ShowArgs {
    /// The flags as config overrides, with an optional output path.
    pub fn overrides(&self, output: Option<&Path>) -> CliOverrides {
        CliOverrides {
            output: output.map(Path::to_path_buf),
            duration: self.duration,
            fps: self.fps,
            width: self.width,
            height: self.height,
            intensity: self.intensity,
            seed: self.seed,
            kinds: (!self.kinds.is_empty()).then(|| self.kinds.clone()),
        }
    }

    /// Load the config file and apply these flags on top.
    pub(crate) fn resolve(&self, output: Option<&Path>) -> Result<SkyburstConfig, ConfigError> {
        let mut config = config::load_config(self.config.as_deref())?;
        config::merge_cli_overrides(&mut config, &self.overrides(output));
        config::loader::ensure_valid(&config)?;
        Ok(config)
    }
}

/// Report a config failure and pick the exit code for it.
pub(crate) fn config_error_exit(e: &ConfigError) -> ExitCode {
    eprintln!("Error: {}", e);
    match e {
        ConfigError::Io(_) => ExitCode::from(EXIT_ERROR),
        _ => ExitCode::from(EXIT_INVALID_ARGS),
    }
}

/// Install the stderr log subscriber.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Run the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render { output, show, json } => {
            render::run_render(output.as_deref(), &show, json)
        }
        Commands::Preview { frame, output, show } => preview::run_preview(frame, &output, &show),
        Commands::Init { path, force } => init::run_init(path.as_deref(), force),
    }
}
