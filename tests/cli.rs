use image::{DynamicImage, Rgb, RgbImage};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_exif-report"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut img = RgbImage::new(8, 4);
    img.put_pixel(0, 0, Rgb([200, 10, 10]));
    DynamicImage::ImageRgb8(img).save(&path).unwrap();
    path
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn nonexistent_image_exits_with_error_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report.txt");

    let output = run(
        dir.path(),
        &["missing.jpg", "--out", out.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("file not found"), "stderr: {stderr}");
    assert!(!out.exists());
    assert!(!dir.path().join("output.txt").exists());
}

#[test]
fn png_produces_json_and_default_report() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "plain.png");

    let output = run(dir.path(), &["plain.png"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["file"]["name"], "plain.png");
    assert_eq!(json["file"]["format"], "PNG");
    assert_eq!(json["file"]["size"]["width"], 8);
    assert_eq!(json["file"]["size"]["height"], 4);
    assert_eq!(json["exif"], serde_json::json!({}));
    assert_eq!(json["gps"], serde_json::json!({}));
    assert_eq!(json["summary"]["has_gps"], false);
    assert!(json.get("ocr").is_none());

    let report = std::fs::read_to_string(dir.path().join("output.txt")).unwrap();
    assert!(report.starts_with("# Image Metadata Report: plain.png\n"));
    assert!(!report.contains("## OCR"));
}

#[test]
fn existing_report_is_fully_overwritten() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "plain.png");
    let out = dir.path().join("report.txt");
    std::fs::write(&out, "leftover line from a previous run\n".repeat(200)).unwrap();

    let output = run(dir.path(), &["plain.png", "--out", "report.txt"]);
    assert!(output.status.success());

    let report = std::fs::read_to_string(&out).unwrap();
    assert!(!report.contains("leftover"));
    assert!(report.starts_with("# Image Metadata Report: plain.png"));
}

#[test]
fn ocr_without_engine_reports_note() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "plain.png");
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "ocr": { "command": "definitely-not-an-ocr-binary-4242" } }"#,
    )
    .unwrap();

    let output = run(
        dir.path(),
        &["plain.png", "--ocr", "--config", "config.json"],
    );
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["ocr"]["text"], Value::Null);
    assert_eq!(json["ocr"]["language"], Value::Null);
    assert_eq!(
        json["ocr"]["note"],
        "definitely-not-an-ocr-binary-4242 not installed; skip OCR."
    );

    let report = std::fs::read_to_string(dir.path().join("output.txt")).unwrap();
    assert!(report.contains("## OCR"));
    assert!(report.contains("- Note: definitely-not-an-ocr-binary-4242 not installed; skip OCR."));
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "plain.png");
    std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();

    let output = run(
        dir.path(),
        &["plain.png", "--ocr", "--config", "config.json"],
    );
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse config file"), "stderr: {stderr}");

    let json = stdout_json(&output);
    assert_eq!(json["file"]["name"], "plain.png");
    assert!(json.get("ocr").is_some());
    assert!(dir.path().join("output.txt").exists());
}

#[test]
fn undecodable_image_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.jpg"), b"this is not a jpeg").unwrap();

    let output = run(dir.path(), &["broken.jpg"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("output.txt").exists());
}

#[test]
fn init_writes_default_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    let output = run(dir.path(), &["--init", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(written["ocr"]["command"], "tesseract");
    assert_eq!(written["language"]["enabled"], true);
}
