//! File-based tests: loading selections from disk and the `photos` CLI.

mod common;

use std::path::Path;
use std::process::Command;

use common::fixtures::{gradient_png, transparent_png};
use common::http::serve_once;
use storefront_photos::{ErrorKind, ImageNormalizer, RawSelection};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn photos(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_photos"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run photos binary")
}

/// Run the binary without blocking the runtime that hosts the local server.
async fn photos_async(args: &[&str]) -> std::process::Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_photos"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .await
        .expect("run photos binary")
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_from_path_detects_mime() {
    let dir = TempDir::new().unwrap();
    let png = write(&dir, "front.png", &gradient_png(20, 10));

    let selection = RawSelection::from_path(&png).unwrap();
    assert_eq!(selection.mime_type, "image/png");
    assert_eq!(selection.size_bytes, selection.bytes.len() as u64);

    let image = ImageNormalizer::default().normalize(&selection).unwrap();
    assert_eq!((image.width(), image.height()), (20, 10));
}

#[test]
fn test_from_path_unknown_extension_is_not_an_image() {
    let dir = TempDir::new().unwrap();
    // PNG bytes behind a .txt name are still rejected on the declared type.
    let txt = write(&dir, "notes.txt", &gradient_png(4, 4));

    let selection = RawSelection::from_path(&txt).unwrap();
    let err = ImageNormalizer::default().normalize(&selection).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFileType);
}

#[test]
fn test_from_path_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = RawSelection::from_path(dir.path().join("gone.png")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("gone.png"));
}

#[test]
fn test_cli_normalize_writes_jpeg() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "wide.png", &gradient_png(2400, 1200));
    let output = dir.path().join("out.jpg");

    let result = photos(&["normalize", arg(&input), "-o", arg(&output)]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("1200x600"), "{}", stdout);

    let written = image::open(&output).unwrap();
    assert_eq!((written.width(), written.height()), (1200, 600));
}

#[test]
fn test_cli_normalize_default_output_name() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "logo.png", &transparent_png(8, 8));

    let result = photos(&["normalize", arg(&input)]);
    assert!(result.status.success());
    assert!(dir.path().join("logo_normalized.jpg").exists());
}

#[test]
fn test_cli_slots_json_payload() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.png", &gradient_png(30, 20));
    let b = write(&dir, "b.png", &gradient_png(20, 30));

    let result = photos(&["slots", arg(&a), arg(&b), "--json"]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let body: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert!(
        body["image_url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,")
    );
    assert_eq!(body["images"].as_array().unwrap().len(), 1);
}

#[test]
fn test_cli_slots_table_with_gap() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.png", &gradient_png(30, 20));
    let b = write(&dir, "b.png", &gradient_png(20, 30));

    let result = photos(&["slots", arg(&a), arg(&b), "--remove", "0"]);
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("slot 0 (primary): empty"), "{}", stdout);
    assert!(stdout.contains("Photos: 1/3"), "{}", stdout);
    assert!(String::from_utf8_lossy(&result.stderr).contains("not submitted"));
}

#[test]
fn test_cli_reports_user_message() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "manual.pdf", b"%PDF-1.4");

    let result = photos(&["normalize", arg(&doc)]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Please select an image file"));
}

#[test]
fn test_cli_too_many_files() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.png", &gradient_png(4, 4));

    let result = photos(&["slots", arg(&a), arg(&a), arg(&a), arg(&a)]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("out of range"));
}

#[test]
fn test_cli_rejects_oversized_file_limit() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.png", &gradient_png(4, 4));

    let result = photos(&["normalize", arg(&a), "--max-file-mb", &u64::MAX.to_string()]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("max_file_mb"));
}

#[tokio::test]
async fn test_cli_submit_creates_product() {
    let dir = TempDir::new().unwrap();
    let front = write(&dir, "front.png", &gradient_png(30, 20));
    let side = write(&dir, "side.png", &gradient_png(20, 30));
    let (base_url, server) = serve_once("201 Created", r#"{"id":42}"#).await;

    let result = photos_async(&[
        "submit",
        arg(&front),
        arg(&side),
        "--api-url",
        &base_url,
        "--token",
        "s3cret",
        "--name",
        "Desk lamp",
        "--price",
        "24.5",
        "--category",
        "lighting",
    ])
    .await;
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/products HTTP/1.1"), "{}", request);
    assert!(request.to_ascii_lowercase().contains("authorization: bearer s3cret"));
    assert!(request.contains("\"name\":\"Desk lamp\""));
    assert!(request.contains("\"category\":\"lighting\""));
    assert!(request.contains("\"image_url\":\"data:image/jpeg;base64,"));

    let created: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(created["id"], 42);
}

#[tokio::test]
async fn test_cli_submit_reports_rejection() {
    let dir = TempDir::new().unwrap();
    let front = write(&dir, "front.png", &gradient_png(30, 20));
    let (base_url, server) =
        serve_once("422 Unprocessable Entity", r#"{"error":"price"}"#).await;

    let result = photos_async(&[
        "submit",
        arg(&front),
        "--api-url",
        &base_url,
        "--token",
        "tok",
        "--name",
        "Desk lamp",
        "--price",
        "1",
    ])
    .await;
    server.await.unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("check its details"), "{}", stderr);
    assert!(stderr.contains("422"), "{}", stderr);
    assert!(!stderr.contains("try again"), "{}", stderr);
}
