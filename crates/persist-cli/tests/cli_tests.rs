//! Integration tests for the `persist` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to drive the encode, decode,
//! get, set and list subcommands through the actual binary, with stdin/stdout
//! piping and temporary save directories.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

const HERO: &str = r#"{"name":"Hero","level":3,"inventory":[10,20],"stats":{"hp":12.5}}"#;

fn persist() -> Command {
    Command::cargo_bin("persist").unwrap()
}

/// Helper: encode `json` through the binary and return the save bytes.
fn encode_bytes(json: &str) -> Vec<u8> {
    let output = persist()
        .arg("encode")
        .write_stdin(json)
        .output()
        .expect("encode should run");
    assert!(output.status.success());
    output.stdout
}

/// Helper: write an encoded save file into `dir` and return its path.
fn hero_save(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("hero.save");
    std::fs::write(&path, encode_bytes(HERO)).unwrap();
    path
}

// ─────────────────────────────────────────────────────────────────────────────
// Encode / decode
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encode_produces_messagepack_map() {
    let bytes = encode_bytes(r#"{"a":true}"#);
    assert_eq!(bytes, vec![0x81, 0xa1, b'a', 0xc3]);
}

#[test]
fn decode_roundtrips_json() {
    let output = persist()
        .arg("decode")
        .write_stdin(encode_bytes(HERO))
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    let expected: Value = serde_json::from_str(HERO).unwrap();
    assert_eq!(value, expected);
}

#[test]
fn encode_file_to_file_and_decode_to_file() {
    let dir = TempDir::new().unwrap();
    let json_in = dir.path().join("in.json");
    let save = dir.path().join("out.save");
    let json_out = dir.path().join("out.json");
    std::fs::write(&json_in, HERO).unwrap();

    persist()
        .args(["encode", "-i"])
        .arg(&json_in)
        .arg("-o")
        .arg(&save)
        .assert()
        .success();
    persist()
        .args(["decode", "-i"])
        .arg(&save)
        .arg("-o")
        .arg(&json_out)
        .assert()
        .success();

    let content = std::fs::read_to_string(&json_out).unwrap();
    assert!(content.contains("\"Hero\""));
}

#[test]
fn encode_rejects_null() {
    persist()
        .arg("encode")
        .write_stdin(r#"{"a":null}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON input"));
}

#[test]
fn decode_rejects_garbage() {
    persist()
        .arg("decode")
        .write_stdin(vec![0xc1u8])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode save data"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Get / set
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn get_prints_node_json() {
    let dir = TempDir::new().unwrap();
    let save = hero_save(&dir);
    persist()
        .args(["get", "-i"])
        .arg(&save)
        .arg("inventory[1]")
        .assert()
        .success()
        .stdout(predicate::str::diff("20\n"));
}

#[test]
fn get_undefined_field_fails() {
    let dir = TempDir::new().unwrap();
    let save = hero_save(&dir);
    persist()
        .args(["get", "-i"])
        .arg(&save)
        .arg("stats.mana")
        .assert()
        .failure()
        .stderr(predicate::str::contains("undefined field"));
}

#[test]
fn get_malformed_path_fails() {
    persist()
        .args(["get", "[0]"])
        .write_stdin(encode_bytes(HERO))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid path"));
}

#[test]
fn set_writes_back_in_place() {
    let dir = TempDir::new().unwrap();
    let save = hero_save(&dir);
    persist()
        .args(["set", "-i"])
        .arg(&save)
        .args(["stats.hp", "40"])
        .assert()
        .success();

    let output = persist()
        .args(["get", "-i"])
        .arg(&save)
        .arg("stats")
        .output()
        .unwrap();
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, json!({"hp": 40}));
}

#[test]
fn set_out_of_bounds_fails() {
    let dir = TempDir::new().unwrap();
    let save = hero_save(&dir);
    persist()
        .args(["set", "-i"])
        .arg(&save)
        .args(["inventory[5]", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of bounds"));
}

// ─────────────────────────────────────────────────────────────────────────────
// List
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn list_uses_directory_and_extension_flags() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("slots")).unwrap();
    std::fs::write(dir.path().join("b.dat"), encode_bytes("1")).unwrap();
    std::fs::write(dir.path().join("slots/a.dat"), encode_bytes("2")).unwrap();
    std::fs::write(dir.path().join("ignored.save"), encode_bytes("3")).unwrap();

    persist()
        .args(["list", "--extension", ".dat", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("b\nslots/a\n"));
}

#[test]
fn list_reads_directory_from_environment() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("one.save"), encode_bytes("1")).unwrap();
    std::fs::write(dir.path().join("two.save"), encode_bytes("2")).unwrap();

    persist()
        .arg("list")
        .args(["--prefix", "t"])
        .env("PERSIST_DIR", dir.path())
        .env_remove("PERSIST_EXTENSION")
        .assert()
        .success()
        .stdout(predicate::str::diff("two\n"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Help
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    persist()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("encode"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn missing_subcommand_fails() {
    persist().assert().failure();
}
