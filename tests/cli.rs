//! Integration tests for the trt-builder binary.

use std::path::Path;
use std::process::{Command, Output};

/// Single `Relu` ONNX model from `input` to `output`, both shaped `[1, 3, 300, 300]`.
const RELU_300_ONNX: &[u8] = &[
    0x08, 0x07, 0x12, 0x10, 0x74, 0x72, 0x74, 0x2d, 0x62, 0x75, 0x69, 0x6c, 0x64, 0x65, 0x72, 0x2d,
    0x74, 0x65, 0x73, 0x74, 0x3a, 0x64, 0x0a, 0x15, 0x0a, 0x05, 0x69, 0x6e, 0x70, 0x75, 0x74, 0x12,
    0x06, 0x6f, 0x75, 0x74, 0x70, 0x75, 0x74, 0x22, 0x04, 0x52, 0x65, 0x6c, 0x75, 0x12, 0x04, 0x72,
    0x65, 0x6c, 0x75, 0x5a, 0x21, 0x0a, 0x05, 0x69, 0x6e, 0x70, 0x75, 0x74, 0x12, 0x18, 0x0a, 0x16,
    0x08, 0x01, 0x12, 0x12, 0x0a, 0x02, 0x08, 0x01, 0x0a, 0x02, 0x08, 0x03, 0x0a, 0x03, 0x08, 0xac,
    0x02, 0x0a, 0x03, 0x08, 0xac, 0x02, 0x62, 0x22, 0x0a, 0x06, 0x6f, 0x75, 0x74, 0x70, 0x75, 0x74,
    0x12, 0x18, 0x0a, 0x16, 0x08, 0x01, 0x12, 0x12, 0x0a, 0x02, 0x08, 0x01, 0x0a, 0x02, 0x08, 0x03,
    0x0a, 0x03, 0x08, 0xac, 0x02, 0x0a, 0x03, 0x08, 0xac, 0x02, 0x42, 0x02, 0x10, 0x0c,
];

fn write_model(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("relu.onnx");
    std::fs::write(&path, RELU_300_ONNX).unwrap();
    path
}

fn trt_builder(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trt-builder"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run trt-builder")
}

#[test]
fn test_cli_help() {
    let output = trt_builder(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--input",
        "--precision",
        "--batch-size",
        "--workspace",
        "--model-width",
        "--model-height",
        "--output",
        "--verify",
    ] {
        assert!(stdout.contains(flag), "help is missing {flag}");
    }
}

#[test]
fn test_cli_version() {
    let output = trt_builder(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("trt-builder"));
}

#[test]
fn test_cli_requires_input() {
    let output = trt_builder(&[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--input"));
}

#[test]
fn test_cli_rejects_invalid_precision() {
    let dir = tempfile::tempdir().unwrap();
    let engine_path = dir.path().join("engine.trt");
    let output = trt_builder(&[
        "-i",
        "model.onnx",
        "-p",
        "8",
        "-o",
        engine_path.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported precision"));
    assert!(!engine_path.exists());
}

#[test]
fn test_cli_rejects_zero_batch_size() {
    let output = trt_builder(&["-i", "model.onnx", "-b", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_missing_model() {
    let dir = tempfile::tempdir().unwrap();
    let engine_path = dir.path().join("out").join("engine.trt");
    let output = trt_builder(&[
        "-i",
        dir.path().join("missing.onnx").to_str().unwrap(),
        "-o",
        engine_path.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Building TensorRT engine. This may take a few minutes."));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to build engine"));
    assert!(!engine_path.exists());
}

#[test]
fn test_cli_builds_engine_with_default_flags() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write_model(dir.path());
    let engine_path = dir.path().join("engines").join("engine.trt");
    let output = trt_builder(&[
        "-i",
        model_path.to_str().unwrap(),
        "-o",
        engine_path.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Building TensorRT engine. This may take a few minutes."));
    assert!(stdout.contains(&format!("TensorRT engine saved to {}", engine_path.display())));
    assert!(std::fs::metadata(&engine_path).unwrap().len() > 0);
}

#[test]
fn test_cli_verify_reloads_engine() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write_model(dir.path());
    let engine_path = dir.path().join("engine.trt");
    let output = trt_builder(&[
        "-i",
        model_path.to_str().unwrap(),
        "-mw",
        "300",
        "-mh",
        "300",
        "-o",
        engine_path.to_str().unwrap(),
        "--verify",
        "-v",
    ]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("engine tensor"));
    assert!(stderr.contains("output"));
}

#[test]
fn test_cli_rejects_size_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write_model(dir.path());
    let engine_path = dir.path().join("engine.trt");
    let output = trt_builder(&[
        "-i",
        model_path.to_str().unwrap(),
        "-mw",
        "416",
        "-o",
        engine_path.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected [1, 3, 416, 300]"));
    assert!(!engine_path.exists());
}
