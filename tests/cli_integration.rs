//! CLI integration tests for the bandpaint binary
//!
//! These tests run the binary against fixture files and check exit codes,
//! output messages and the images written.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn bandpaint(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bandpaint"))
        .args(args)
        .output()
        .expect("Failed to execute bandpaint")
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_render_writes_screen_sized_png() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("meadow.png");

    let output = bandpaint(&["render", arg(&fixture("meadow.json")), "-o", arg(&out)]);

    assert!(output.status.success(), "render failed: {}", stderr(&output));
    assert!(stdout(&output).contains("Saved:"));
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (320, 200));
}

#[test]
fn test_render_scale_and_priority_map() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("meadow.png");

    let output = bandpaint(&[
        "render",
        arg(&fixture("meadow.json")),
        "-o",
        arg(&out),
        "--scale",
        "2",
        "--priority",
    ]);

    assert!(output.status.success(), "render failed: {}", stderr(&output));
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (640, 400));

    let priority = image::open(dir.path().join("meadow_priority.png")).unwrap().to_rgba8();
    assert_eq!(priority.dimensions(), (640, 400));
    // Open sky was never drawn, so it is priority 0
    assert_eq!(priority.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn test_render_json5_scene() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("meadow5.png");

    let output = bandpaint(&["render", arg(&fixture("meadow.json5")), "-o", arg(&out)]);

    assert!(output.status.success(), "render failed: {}", stderr(&output));
    assert!(out.exists());
}

#[test]
fn test_render_lenient_warns_and_succeeds() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("bad.png");

    let output = bandpaint(&["render", arg(&fixture("bad_color.json")), "-o", arg(&out)]);

    assert!(output.status.success(), "render failed: {}", stderr(&output));
    assert!(stderr(&output).contains("chartreuse"));
    assert!(out.exists());
}

#[test]
fn test_render_strict_fails_on_bad_color() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("bad.png");

    let output = bandpaint(&[
        "render",
        arg(&fixture("bad_color.json")),
        "-o",
        arg(&out),
        "--strict",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error:"));
    assert!(!out.exists());
}

#[test]
fn test_render_missing_input_is_invalid_args() {
    let output = bandpaint(&["render", "does/not/exist.json"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_render_unparseable_scene_fails() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("broken.png");

    let output = bandpaint(&["render", arg(&fixture("broken.json")), "-o", arg(&out)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid scene descriptor"));
}

#[test]
fn test_bad_scale_rejected_by_parser() {
    let output = bandpaint(&["render", arg(&fixture("meadow.json")), "--scale", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_file_sets_scale() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("scaled.png");

    let output = bandpaint(&[
        "--config",
        arg(&fixture("bandpaint.toml")),
        "render",
        arg(&fixture("meadow.json")),
        "-o",
        arg(&out),
    ]);

    assert!(output.status.success(), "render failed: {}", stderr(&output));
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (640, 400));
}

#[test]
fn test_animate_writes_gif() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("walk.gif");

    let output = bandpaint(&[
        "animate",
        arg(&fixture("meadow.json")),
        "--views",
        arg(&fixture("views.json")),
        "--sprites",
        arg(&fixture("sprites.json")),
        "--frames",
        "12",
        "-o",
        arg(&out),
    ]);

    assert!(output.status.success(), "animate failed: {}", stderr(&output));
    assert!(stdout(&output).contains("12 frames"));
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (320, 200));
}

#[test]
fn test_animate_unknown_view_suggests() {
    let dir = TempDir::new().unwrap();
    let sprites = dir.path().join("sprites.json");
    std::fs::write(&sprites, r#"[{"view": "eg0", "x": 0, "y": 0}]"#).unwrap();

    let output = bandpaint(&[
        "animate",
        arg(&fixture("meadow.json")),
        "--views",
        arg(&fixture("views.json")),
        "--sprites",
        arg(&sprites),
        "-o",
        arg(&dir.path().join("out.gif")),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("did you mean 'ego'?"));
}

#[test]
fn test_validate_reports_each_scene() {
    let output = bandpaint(&[
        "validate",
        arg(&fixture("meadow.json")),
        arg(&fixture("bad_color.json")),
    ]);

    assert!(output.status.success(), "validate failed: {}", stdout(&output));
    let text = stdout(&output);
    assert!(text.contains("OK   "));
    assert!(text.contains("(2 warnings)"));
}

#[test]
fn test_validate_strict_fails() {
    let output = bandpaint(&["validate", "--strict", arg(&fixture("bad_color.json"))]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("FAIL"));
}

#[test]
fn test_validate_json_output() {
    let output = bandpaint(&["validate", "--json", arg(&fixture("broken.json"))]);

    assert_eq!(output.status.code(), Some(1));
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["ok"], false);
    assert!(reports[0]["error"].as_str().unwrap().contains("invalid scene descriptor"));
}

#[test]
fn test_palette_lists_sixteen_colors() {
    let output = bandpaint(&["palette", "--json"]);

    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 16);
    assert_eq!(entries[14]["name"], "yellow");
    assert_eq!(entries[14]["hex"], "#FFFF55");
}
