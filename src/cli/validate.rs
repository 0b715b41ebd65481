//! Validate command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use serde::Serialize;

use crate::config::CliOverrides;
use crate::scene::{BuildOptions, RenderedScene};

use super::{load_settings, read_scene, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Outcome of checking one scene file.
#[derive(Debug, Serialize)]
pub(crate) struct SceneReport {
    pub path: PathBuf,
    pub ok: bool,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Execute the validate command
pub fn run_validate(
    scenes: &[PathBuf],
    config_path: Option<&Path>,
    strict: bool,
    json: bool,
) -> ExitCode {
    let overrides = CliOverrides {
        strict: strict.then_some(true),
        scale: None,
    };
    let options = match load_settings(config_path, &overrides) {
        Ok(config) => config.engine_options().build_options(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let reports: Vec<SceneReport> = scenes
        .iter()
        .map(|path| check_scene(path, &options))
        .collect();

    if json {
        match serde_json::to_string_pretty(&reports) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    if reports.iter().all(|r| r.ok) {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// Build one scene and summarize the result.
///
/// In strict mode warnings also fail the scene.
pub(crate) fn check_scene(path: &Path, options: &BuildOptions) -> SceneReport {
    let built = read_scene(path).and_then(|desc| {
        RenderedScene::build(&desc, options).with_context(|| format!("in '{}'", path.display()))
    });

    match built {
        Ok(scene) => {
            let warnings: Vec<String> = scene.warnings.iter().map(|w| w.to_string()).collect();
            SceneReport {
                path: path.to_path_buf(),
                ok: !(options.strict && !warnings.is_empty()),
                warnings,
                error: None,
            }
        }
        Err(e) => SceneReport {
            path: path.to_path_buf(),
            ok: false,
            warnings: Vec::new(),
            error: Some(format!("{:#}", e)),
        },
    }
}

fn print_report(report: &SceneReport) {
    match (&report.error, report.ok) {
        (Some(error), _) => println!("FAIL {}: {}", report.path.display(), error),
        (None, true) if report.warnings.is_empty() => println!("OK   {}", report.path.display()),
        (None, ok) => println!(
            "{} {} ({} warning{})",
            if ok { "OK  " } else { "FAIL" },
            report.path.display(),
            report.warnings.len(),
            if report.warnings.len() == 1 { "" } else { "s" }
        ),
    }
    for warning in &report.warnings {
        println!("  - {}", warning);
    }
}
