// ==========================================
// unit-convert 命令行端到端测试
// ==========================================
// 覆盖: convert / check / validate / fingerprint 子命令
// 方式: 在临时目录写入快照文件后直接运行编译好的二进制
// ==========================================


use std::path::Path;
use std::process::{Command, Output};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use test_helpers::{standard_snapshot, standard_snapshot_json};

fn snapshot_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("rules.json"), standard_snapshot_json()).unwrap();
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_unit-convert"))
        .arg("--snapshot")
        .arg(dir.join("rules.json"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap()
}

/// 小数字段可能序列化为字符串或数字
fn decimal_field(value: &serde_json::Value, field: &str) -> Decimal {
    let raw = value[field].to_string();
    raw.trim_matches('"').parse().unwrap()
}

#[test]
fn test_convert_prints_result_json() {
    let dir = snapshot_dir();
    let output = run(dir.path(), &["convert", "kg", "g", "2"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value = stdout_json(&output);
    assert_eq!(decimal_field(&value, "converted_quantity"), dec!(2000));
    assert_eq!(value["source"], "DIRECT");
    assert_eq!(value["conversion_path"], "kg -> g");
}

#[test]
fn test_convert_with_material() {
    let dir = snapshot_dir();
    let output = run(dir.path(), &["convert", "瓶", "ml", "2", "--material", "M1"]);
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(decimal_field(&value, "converted_quantity"), dec!(660));
    assert_eq!(value["source"], "MATERIAL_OVERRIDE");
}

#[test]
fn test_convert_failure_exits_non_zero() {
    let dir = snapshot_dir();

    let output = run(dir.path(), &["convert", "箱", "g", "1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("UNSUPPORTED_CONVERSION"), "{}", stderr);
    assert!(output.stdout.is_empty());

    let output = run(dir.path(), &["convert", "ml", "L", "0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("VALIDATION_FAILURE"));
}

#[test]
fn test_check_reports_feasibility() {
    let dir = snapshot_dir();

    let output = run(dir.path(), &["check", "L", "瓶"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["can_convert"], true);

    let output = run(dir.path(), &["check", "箱", "g"]);
    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["can_convert"], false);
    assert_eq!(value["from_unit_code"], "箱");
}

#[test]
fn test_validate_and_fingerprint() {
    let dir = snapshot_dir();

    let output = run(dir.path(), &["validate"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = run(dir.path(), &["fingerprint"]);
    assert!(output.status.success());
    let printed = String::from_utf8_lossy(&output.stdout);
    assert_eq!(printed.trim(), standard_snapshot().fingerprint());
}

#[test]
fn test_missing_snapshot_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["fingerprint"]);
    assert!(!output.status.success());
}
