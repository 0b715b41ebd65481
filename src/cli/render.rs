//! Render command implementation

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;

use crate::config::CliOverrides;
use crate::output::{
    default_output_path, frame_to_image, priority_output_path, priority_to_image, save_png,
    scale_image,
};
use crate::scene::RenderedScene;

use super::{load_settings, read_scene, report, EXIT_SUCCESS};

/// Execute the render command
pub fn run_render(
    input: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
    overrides: CliOverrides,
    priority: bool,
) -> ExitCode {
    match render(input, output, config_path, &overrides, priority) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => report(e),
    }
}

fn render(
    input: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    priority: bool,
) -> anyhow::Result<()> {
    let config = load_settings(config_path, overrides)?;
    let desc = read_scene(input)?;

    let scene = RenderedScene::build(&desc, &config.engine_options().build_options())
        .with_context(|| format!("cannot render '{}'", input.display()))?;
    for warning in &scene.warnings {
        eprintln!("Warning: {}", warning);
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input, None, "png"));
    let scale = config.output.scale;

    save_png(&scale_image(frame_to_image(&scene.bitmap), scale), &output)
        .with_context(|| format!("cannot write '{}'", output.display()))?;
    println!("Saved: {}", output.display());

    if priority {
        let path = priority_output_path(&output);
        save_png(&scale_image(priority_to_image(&scene.priority), scale), &path)
            .with_context(|| format!("cannot write '{}'", path.display()))?;
        println!("Saved: {}", path.display());
    }

    Ok(())
}
