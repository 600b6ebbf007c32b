mod common;

use common::packages::write_crate;
use std::fs;
use std::process::Command;

fn sigroute_gen() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sigroute-gen"));
    cmd.env("SIGROUTE_LOG_LEVEL", "error");
    cmd
}

#[test]
fn test_cli_generate_writes_module() {
    let dir = tempfile::tempdir().unwrap();
    let package = dir.path().join("oracle");
    write_crate(
        &package,
        "oracle",
        &[("lib.rs", "pub fn price(pair: &str) -> f64 { pair.len() as f64 }\n")],
    );
    let output = dir.path().join("server/main.rs");

    let result = sigroute_gen()
        .arg("generate")
        .arg("--package")
        .arg(&package)
        .arg("--output")
        .arg(&output)
        .output()
        .expect("run cli");
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Generated 1 route(s) for `oracle`"));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("// @generated by sigroute-gen"));
    assert!(written.contains("Route::new(\"/api/price\", handle_price)"));
}

#[test]
fn test_cli_dry_run_prints_to_stdout() {
    let result = sigroute_gen()
        .args(["generate", "--package", "demos/wallet", "--dry-run"])
        .output()
        .expect("run cli");
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("use ::wallet as lib;"));
    assert!(!stdout.contains("/api/shutdown"));
}

#[test]
fn test_cli_inspect_json() {
    let result = sigroute_gen()
        .args(["inspect", "--package", "demos/wallet", "--json"])
        .output()
        .expect("run cli");
    assert!(result.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 15);
    let deposit = entries.iter().find(|e| e["name"] == "deposit").unwrap();
    assert_eq!(deposit["receiver"], "&mut lib::Wallet");
    assert_eq!(deposit["mapping"], "indexed");
    let withdraw = entries.iter().find(|e| e["name"] == "withdraw").unwrap();
    assert_eq!(withdraw["mapping"], "value_or_error");
}

#[test]
fn test_cli_missing_package_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("main.rs");
    let result = sigroute_gen()
        .arg("generate")
        .arg("--package")
        .arg(dir.path().join("nope"))
        .arg("--output")
        .arg(&output)
        .output()
        .expect("run cli");
    assert!(!result.status.success());
    assert!(!output.exists());
}
