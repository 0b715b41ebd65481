//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod animate;
mod info;
mod render;
mod validate;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;

use crate::config::{load_config, merge_cli_overrides, BandpaintConfig, CliOverrides};
use crate::scene::SceneDescriptor;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Bandpaint - rasterize palette-locked vector scenes and composite sprites
#[derive(Parser)]
#[command(name = "bandpaint")]
#[command(about = "Bandpaint - rasterize 16-color vector scenes and composite sprites by priority band")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to bandpaint.toml (default: search upward from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a scene descriptor to PNG
    Render {
        /// Scene descriptor (.json or .json5)
        scene: PathBuf,

        /// Output PNG (default: {scene}.png next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-16, default from config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=16))]
        scale: Option<u32>,

        /// Strict mode: invalid colors fail the render
        #[arg(long)]
        strict: bool,

        /// Also write the priority buffer as a grayscale PNG
        #[arg(long)]
        priority: bool,
    },

    /// Animate sprites over a scene and write an animated GIF
    Animate {
        /// Scene descriptor (.json or .json5)
        scene: PathBuf,

        /// View library: a JSON array of view descriptors
        #[arg(long)]
        views: PathBuf,

        /// Sprite placements: a JSON array
        #[arg(long)]
        sprites: PathBuf,

        /// Number of frames to render
        #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=10000))]
        frames: u32,

        /// Output GIF
        #[arg(short, long)]
        output: PathBuf,

        /// Scale output by integer factor (1-16, default from config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=16))]
        scale: Option<u32>,

        /// Strict mode: invalid colors fail the render
        #[arg(long)]
        strict: bool,
    },

    /// Check scene descriptors without writing anything
    Validate {
        /// Scene descriptors to check
        #[arg(required = true)]
        scenes: Vec<PathBuf>,

        /// Treat invalid colors and skipped primitives as errors
        #[arg(long)]
        strict: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the fixed 16-color palette
    Palette {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Render {
            scene,
            output,
            scale,
            strict,
            priority,
        } => render::run_render(
            &scene,
            output.as_deref(),
            config_path,
            overrides(strict, scale),
            priority,
        ),
        Commands::Animate {
            scene,
            views,
            sprites,
            frames,
            output,
            scale,
            strict,
        } => animate::run_animate(
            &scene,
            &views,
            &sprites,
            frames,
            &output,
            config_path,
            overrides(strict, scale),
        ),
        Commands::Validate {
            scenes,
            strict,
            json,
        } => validate::run_validate(&scenes, config_path, strict, json),
        Commands::Palette { json } => info::run_palette(json),
    }
}

/// Install the stderr log subscriber.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    // A subscriber may already be installed when embedded; keep that one
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn overrides(strict: bool, scale: Option<u32>) -> CliOverrides {
    CliOverrides {
        strict: strict.then_some(true),
        scale,
    }
}

/// Load bandpaint.toml (explicit or discovered) and apply CLI overrides.
pub(crate) fn load_settings(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> anyhow::Result<BandpaintConfig> {
    let mut config = load_config(config_path).context("loading configuration")?;
    merge_cli_overrides(&mut config, overrides);
    Ok(config)
}

/// Read and parse a scene descriptor file.
pub(crate) fn read_scene(path: &Path) -> anyhow::Result<SceneDescriptor> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read scene '{}'", path.display()))?;
    SceneDescriptor::from_json(&text).with_context(|| format!("in '{}'", path.display()))
}

/// Scene id for a descriptor file: its file stem.
pub(crate) fn scene_id(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scene")
        .to_string()
}

/// Print an error chain and map it to an exit code.
pub(crate) fn report(error: anyhow::Error) -> ExitCode {
    eprintln!("Error: {:#}", error);
    let missing_input = error
        .chain()
        .filter_map(|e| e.downcast_ref::<std::io::Error>())
        .any(|e| e.kind() == std::io::ErrorKind::NotFound);
    if missing_input {
        ExitCode::from(EXIT_INVALID_ARGS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}
