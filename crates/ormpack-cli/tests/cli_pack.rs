//! Integration tests for the ormpack binary
//!
//! Tests verify:
//! - exit codes for usage, format, validation and encode failures
//! - no output file is written when a run fails
//! - human and JSON reports
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ormpack-cli --test cli_pack
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

struct CliResult {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

fn run_ormpack(args: &[&str]) -> CliResult {
    let args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();
    run_ormpack_os(&args)
}

fn run_ormpack_os(args: &[&OsStr]) -> CliResult {
    let output: Output = Command::new(env!("CARGO_BIN_EXE_ormpack"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute ormpack");

    CliResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Creates a temp material folder and writes gray PNG maps into it.
fn material_dir() -> TempDir {
    tempdir().unwrap()
}

fn write_map(dir: &Path, suffix: &str, width: u32, height: u32, value: u8) -> PathBuf {
    let path = dir.join(format!("Mat_{}.png", suffix));
    image::GrayImage::from_pixel(width, height, image::Luma([value]))
        .save(&path)
        .unwrap();
    path
}

fn base(dir: &Path) -> String {
    dir.join("Mat_Color.png").to_str().unwrap().to_string()
}

#[test]
fn test_pack_png_success() {
    let dir = material_dir();
    write_map(dir.path(), "AmbientOcclusion", 8, 4, 10);
    write_map(dir.path(), "Roughness", 8, 4, 20);
    write_map(dir.path(), "Metalness", 8, 4, 30);

    let result = run_ormpack(&[&base(dir.path()), "png"]);

    assert_eq!(result.exit_code, 0, "stdout: {}", result.stdout);
    assert!(result.stdout.contains("wrote 8x4 ORM file"), "stdout: {}", result.stdout);

    let output = image::open(dir.path().join("Mat_ORM.png")).unwrap().into_rgb8();
    assert_eq!(output.dimensions(), (8, 4));
    assert!(output.pixels().all(|p| p.0 == [10, 20, 30]));
}

#[test]
fn test_pack_jpg_success() {
    let dir = material_dir();
    write_map(dir.path(), "Roughness", 16, 16, 128);

    let result = run_ormpack(&[&base(dir.path()), "jpg"]);

    assert_eq!(result.exit_code, 0, "stdout: {}", result.stdout);
    let output = image::open(dir.path().join("Mat_ORM.jpg")).unwrap();
    assert_eq!((output.width(), output.height()), (16, 16));
    assert_eq!(output.color().channel_count(), 3);
}

#[test]
fn test_wrong_argument_count_exits_1() {
    let result = run_ormpack(&["only_one_arg_Color.png"]);
    assert_eq!(result.exit_code, 1);

    let result = run_ormpack(&["a_Color.png", "png", "extra"]);
    assert_eq!(result.exit_code, 1);
}

#[test]
fn test_help_exits_0() {
    let result = run_ormpack(&["--help"]);
    assert_eq!(result.exit_code, 0);
    assert!(result.stdout.contains("ORM"));
}

#[test]
fn test_invalid_format_exits_1() {
    let dir = material_dir();
    write_map(dir.path(), "Roughness", 2, 2, 1);

    let result = run_ormpack(&[&base(dir.path()), "tga"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stdout.contains("jpg or png"), "stdout: {}", result.stdout);
    assert!(!dir.path().join("Mat_ORM.tga").exists());
}

#[test]
fn test_no_siblings_exits_1_without_output() {
    let dir = material_dir();

    let result = run_ormpack(&[&base(dir.path()), "png"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stdout.contains("no images"), "stdout: {}", result.stdout);
    assert!(!dir.path().join("Mat_ORM.png").exists());
}

#[test]
fn test_dimension_mismatch_reports_both() {
    let dir = material_dir();
    write_map(dir.path(), "AmbientOcclusion", 8, 8, 1);
    write_map(dir.path(), "Roughness", 4, 2, 1);

    let result = run_ormpack(&[&base(dir.path()), "png"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stdout.contains("has wrong width: 4 vs 8"), "stdout: {}", result.stdout);
    assert!(result.stdout.contains("has wrong height: 2 vs 8"), "stdout: {}", result.stdout);
    assert!(!dir.path().join("Mat_ORM.png").exists());
}

#[test]
fn test_decode_failure_is_logged_by_default() {
    let dir = material_dir();
    std::fs::write(dir.path().join("Mat_AmbientOcclusion.png"), b"not a png").unwrap();
    write_map(dir.path(), "Roughness", 4, 4, 50);

    let result = run_ormpack(&[&base(dir.path()), "png"]);

    assert_eq!(result.exit_code, 0, "stdout: {}", result.stdout);
    assert!(
        result.stderr.contains("could not read image"),
        "stderr: {}",
        result.stderr
    );
    assert!(result.stdout.contains("warning:"), "stdout: {}", result.stdout);
}

#[cfg(unix)]
#[test]
fn test_non_utf8_file_name_finds_siblings() {
    use std::os::unix::ffi::OsStrExt;

    let dir = material_dir();
    let name = |suffix: &str| {
        let mut bytes = b"Mat\xff_".to_vec();
        bytes.extend_from_slice(suffix.as_bytes());
        dir.path().join(OsStr::from_bytes(&bytes))
    };
    image::GrayImage::from_pixel(3, 3, image::Luma([77]))
        .save(name("Roughness.png"))
        .unwrap();

    let base = name("Color.png");
    let result = run_ormpack_os(&[base.as_os_str(), OsStr::new("png")]);

    assert_eq!(result.exit_code, 0, "stdout: {}", result.stdout);
    let output = image::open(name("ORM.png")).unwrap().into_rgb8();
    assert!(output.pixels().all(|p| p.0 == [0, 77, 0]));
}

#[test]
fn test_json_success_output() {
    let dir = material_dir();
    write_map(dir.path(), "Metalness", 3, 5, 255);

    let result = run_ormpack(&[&base(dir.path()), "png", "--json"]);
    assert_eq!(result.exit_code, 0, "stdout: {}", result.stdout);

    let json: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["result"]["width"], 3);
    assert_eq!(json["result"]["height"], 5);
    assert_eq!(json["result"]["channels"], 3);
    assert_eq!(json["result"]["format"], "png");
    assert_eq!(json["sources"][0]["status"], "missing");
    assert_eq!(json["sources"][2]["role"], "metalness");
    assert_eq!(json["sources"][2]["status"], "loaded");

    let size = std::fs::metadata(dir.path().join("Mat_ORM.png")).unwrap().len();
    assert_eq!(json["result"]["file_size"], size);
}

#[test]
fn test_json_failure_output() {
    let dir = material_dir();
    write_map(dir.path(), "AmbientOcclusion", 8, 8, 1);
    write_map(dir.path(), "Metalness", 8, 4, 1);

    let result = run_ormpack(&[&base(dir.path()), "jpg", "--json"]);
    assert_eq!(result.exit_code, 1);

    let json: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["errors"][0]["code"], "ORM_004");
    assert!(json.get("result").is_none());
}

#[test]
fn test_json_invalid_format() {
    let result = run_ormpack(&["Mat_Color.png", "bmp", "--json"]);
    assert_eq!(result.exit_code, 1);

    let json: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(json["errors"][0]["code"], "ORM_001");
}
