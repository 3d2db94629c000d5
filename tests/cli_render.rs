//! CLI integration tests for the skyburst binary
//!
//! These tests run the built binary in scratch directories and check exit
//! codes, printed output and the files written.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use tempfile::TempDir;

/// Get the path to the skyburst binary
fn skyburst_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_skyburst"))
}

/// Run skyburst inside `dir`, isolated from any user-level config
fn run_skyburst(dir: &Path, args: &[&str]) -> Output {
    Command::new(skyburst_binary())
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute skyburst")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

const SMALL_SHOW: &[&str] =
    &["--duration", "1", "--fps", "6", "--width", "64", "--height", "48", "--seed", "7"];

fn render_args<'a>(output: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec!["render", "-o", output];
    args.extend_from_slice(SMALL_SHOW);
    args.extend_from_slice(extra);
    args
}

#[test]
fn test_render_gif() {
    let dir = TempDir::new().unwrap();
    let output = run_skyburst(dir.path(), &render_args("show.gif", &[]));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Saved: show.gif"));

    let file = fs::File::open(dir.path().join("show.gif")).unwrap();
    let decoder = GifDecoder::new(std::io::BufReader::new(file)).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 6);
    assert_eq!(frames[0].buffer().dimensions(), (64, 48));
}

#[test]
fn test_render_png_sequence_with_json_summary() {
    let dir = TempDir::new().unwrap();
    let output = run_skyburst(dir.path(), &render_args("frames", &["--intensity", "20", "--json"]));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["frames_written"], 6);
    assert_eq!(report["fireworks_spawned"], 6);
    assert_eq!(report["seed"], 7);
    assert!(report["peak_particles"].as_u64().unwrap() > 0);

    let written = fs::read_dir(dir.path().join("frames")).unwrap().count();
    assert_eq!(written, 6);
}

#[test]
fn test_render_zero_intensity_is_black() {
    let dir = TempDir::new().unwrap();
    let output = run_skyburst(dir.path(), &render_args("frames", &["--intensity", "0"]));
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    for i in 0..6 {
        let path = dir.path().join(format!("frames/frame_{:05}.png", i));
        let frame = image::open(&path).unwrap().to_rgb8();
        assert!(frame.pixels().all(|p| p.0 == [0, 0, 0]), "frame {} not black", i);
    }
}

#[test]
fn test_render_unsupported_format() {
    let dir = TempDir::new().unwrap();
    let output = run_skyburst(dir.path(), &render_args("show.mp4", &[]));

    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("Error:"), "stderr: {}", err);
    assert!(err.contains("mp4"), "stderr: {}", err);
    assert!(!dir.path().join("show.mp4").exists());
}

#[test]
fn test_render_rejects_zero_fps() {
    let dir = TempDir::new().unwrap();
    let output = run_skyburst(dir.path(), &["render", "-o", "x.gif", "--fps", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_render_unwritable_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("blocker"), b"file").unwrap();

    let output = run_skyburst(dir.path(), &render_args("blocker/show.gif", &[]));
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("blocker"), "stderr: {}", stderr(&output));
}

#[test]
fn test_preview_matches_rendered_frame() {
    let dir = TempDir::new().unwrap();
    let render = run_skyburst(dir.path(), &render_args("frames", &["--intensity", "12"]));
    assert!(render.status.success(), "stderr: {}", stderr(&render));

    let mut args = vec!["preview", "--frame", "3", "-o", "preview.png"];
    args.extend_from_slice(SMALL_SHOW);
    args.extend_from_slice(&["--intensity", "12"]);
    let preview = run_skyburst(dir.path(), &args);
    assert!(preview.status.success(), "stderr: {}", stderr(&preview));

    let rendered = image::open(dir.path().join("frames/frame_00003.png")).unwrap().to_rgb8();
    let previewed = image::open(dir.path().join("preview.png")).unwrap().to_rgb8();
    assert_eq!(rendered, previewed);
}

#[test]
fn test_preview_frame_out_of_range() {
    let dir = TempDir::new().unwrap();
    let mut args = vec!["preview", "--frame", "6"];
    args.extend_from_slice(SMALL_SHOW);

    let output = run_skyburst(dir.path(), &args);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("out of range"));
}

#[test]
fn test_init_then_render_uses_config() {
    let dir = TempDir::new().unwrap();

    let init = run_skyburst(dir.path(), &["init"]);
    assert!(init.status.success(), "stderr: {}", stderr(&init));
    assert!(dir.path().join("skyburst.toml").exists());

    // A second init refuses to overwrite
    let again = run_skyburst(dir.path(), &["init"]);
    assert_eq!(again.status.code(), Some(1));
    assert!(stderr(&again).contains("--force"));

    fs::write(
        dir.path().join("skyburst.toml"),
        "[video]\noutput = \"night\"\nduration = 1\nfps = 4\nwidth = 32\nheight = 24\n\n[show]\nintensity = 3\nseed = 11\n",
    )
    .unwrap();

    let render = run_skyburst(dir.path(), &["render", "--json"]);
    assert!(render.status.success(), "stderr: {}", stderr(&render));
    let report: serde_json::Value = serde_json::from_str(&stdout(&render)).unwrap();
    assert_eq!(report["frames_written"], 4);
    assert_eq!(report["width"], 32);
    assert_eq!(dir.path().join("night").read_dir().unwrap().count(), 4);
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("skyburst.toml"), "[video]\nfps = 0\n").unwrap();

    let output = run_skyburst(dir.path(), &["render", "-o", "x.gif"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("video.fps"), "stderr: {}", stderr(&output));
}

#[test]
fn test_render_mixed_burst_kinds() {
    let dir = TempDir::new().unwrap();
    let output = run_skyburst(
        dir.path(),
        &render_args(
            "mixed.gif",
            &["--intensity", "20", "--kind", "peony,ring,willow,twinkle", "--json"],
        ),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["frames_written"], 6);
    assert_eq!(report["fireworks_spawned"], 6);
    assert_eq!(report["kinds"], serde_json::json!(["peony", "ring", "willow", "twinkle"]));
}

#[test]
fn test_render_rejects_unknown_kind() {
    let dir = TempDir::new().unwrap();
    let output = run_skyburst(dir.path(), &render_args("x.gif", &["--kind", "comet"]));
    assert_eq!(output.status.code(), Some(2));
}
