//! CLI smoke tests for nfd-recipe.
//!
//! These tests verify that commands run without panicking, return
//! appropriate exit codes and never touch the network: source downloads are
//! served by a local mock server.

use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use flate2::Compression;
use flate2::write::GzEncoder;
use predicates::prelude::*;
use serial_test::serial;
use sha2::{Digest, Sha256};
use tempfile::TempDir;

/// Get a Command for the nfd-recipe binary, isolated from the user's env.
fn recipe_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("nfd-recipe");
  cmd.env_remove("NFD_RECIPE_WORKSPACE");
  cmd.env_remove("NFD_RECIPE_SYSREQUIRES_MODE");
  cmd.env_remove("RUST_LOG");
  cmd
}

/// Write an empty config so the user's own `recipe.toml` is never read.
fn empty_config(temp: &TempDir) -> String {
  let path = temp.path().join("recipe.toml");
  std::fs::write(&path, "").unwrap();
  path.display().to_string()
}

fn release_tarball() -> Vec<u8> {
  let files: &[(&str, &[u8])] = &[
    ("nativefiledialog-release_0-test/LICENSE", b"zlib license"),
    ("nativefiledialog-release_0-test/src/include/nfd.h", b"#pragma once\n"),
    ("nativefiledialog-release_0-test/build/gmake_linux/Makefile", b"all:\n"),
    ("nativefiledialog-release_0-test/build/lib/Release/x64/libnfd.a", b"!<arch>\n"),
  ];

  let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
  for (path, contents) in files {
    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, path, *contents).unwrap();
  }
  let mut encoder = builder.into_inner().unwrap();
  encoder.flush().unwrap();
  encoder.finish().unwrap()
}

/// Config that points the source at `server` with the tarball's real digest.
fn mock_source_config(temp: &TempDir, server: &mockito::Server, body: &[u8]) -> String {
  let digest = hex::encode(Sha256::digest(body));
  let content = format!(
    r#"
[source]
version = "0-test"
homepage = "{}"
sha256 = "{}"

[sysreqs]
mode = "disabled"

[link]
toolkit = "fixed"
"#,
    server.url(),
    digest
  );
  let path = temp.path().join("recipe.toml");
  std::fs::write(&path, content).unwrap();
  path.display().to_string()
}

fn workspace_arg(temp: &TempDir) -> String {
  temp.path().join("ws").display().to_string()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  recipe_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  recipe_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("nfd-recipe"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["plan", "source", "build", "package", "create", "info"] {
    recipe_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// Plan
// =============================================================================

#[test]
fn plan_windows_debug() {
  let temp = TempDir::new().unwrap();
  let config = empty_config(&temp);

  recipe_cmd()
    .args(["plan", "--config", &config, "--workspace", &workspace_arg(&temp)])
    .args(["-s", "os=Windows", "-s", "build_type=Debug"])
    .assert()
    .success()
    .stdout(predicate::str::contains("gmake_windows"))
    .stdout(predicate::str::contains("debug_x64"));
}

#[test]
fn plan_linux_zenity_json() {
  let temp = TempDir::new().unwrap();
  let config = empty_config(&temp);

  let output = recipe_cmd()
    .args(["plan", "--output", "json", "--config", &config])
    .args(["--workspace", &workspace_arg(&temp)])
    .args(["-s", "os=Linux", "-o", "use_zenity=True"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert!(plan["build_dir"].as_str().unwrap().ends_with("gmake_linux_zenity"));
  assert_eq!(plan["make_config"], "release_x64");
  assert_eq!(plan["requires_gtk"], false);
}

#[test]
fn plan_zenity_off_linux_fails() {
  let temp = TempDir::new().unwrap();
  let config = empty_config(&temp);

  recipe_cmd()
    .args(["plan", "--config", &config, "--workspace", &workspace_arg(&temp)])
    .args(["-s", "os=Windows", "-o", "use_zenity=True"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("only valid"));
}

#[test]
fn plan_unknown_os_fails() {
  let temp = TempDir::new().unwrap();
  let config = empty_config(&temp);

  recipe_cmd()
    .args(["plan", "--config", &config, "--workspace", &workspace_arg(&temp)])
    .args(["-s", "os=SunOS"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("SunOS"));
}

#[test]
fn malformed_setting_fails() {
  let temp = TempDir::new().unwrap();
  let config = empty_config(&temp);

  recipe_cmd()
    .args(["plan", "--config", &config, "-s", "build_type"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("key=value"));
}

#[test]
fn pinned_version_with_foreign_hash_fails() {
  let temp = TempDir::new().unwrap();
  let path = temp.path().join("recipe.toml");
  let foreign = hex::encode(Sha256::digest(b"some other tarball"));
  std::fs::write(&path, format!("[source]\nversion = \"116\"\nsha256 = \"{}\"\n", foreign)).unwrap();

  recipe_cmd()
    .args(["plan", "--config", &path.display().to_string()])
    .args(["--workspace", &workspace_arg(&temp)])
    .assert()
    .failure()
    .stderr(predicate::str::contains("pinned"));
}

// =============================================================================
// Info
// =============================================================================

#[test]
fn info_shows_platform() {
  let temp = TempDir::new().unwrap();
  let config = empty_config(&temp);

  recipe_cmd()
    .args(["info", "--config", &config, "--workspace", &workspace_arg(&temp)])
    .assert()
    .success()
    .stdout(predicate::str::contains("Platform"))
    .stdout(predicate::str::contains("not built"));
}

// =============================================================================
// Source / Build / Package
// =============================================================================

#[test]
fn build_without_source_fails() {
  let temp = TempDir::new().unwrap();
  let config = empty_config(&temp);

  recipe_cmd()
    .args(["build", "--config", &config, "--workspace", &workspace_arg(&temp)])
    .args(["-s", "os=Linux"])
    .env("NFD_RECIPE_SYSREQUIRES_MODE", "disabled")
    .assert()
    .failure()
    .stderr(predicate::str::contains("System requirements skipped"))
    .stderr(predicate::str::contains("source"));
}

#[test]
#[serial]
fn source_then_package_from_mock_server() {
  let temp = TempDir::new().unwrap();
  let body = release_tarball();
  let mut server = mockito::Server::new();
  let mock = server
    .mock("GET", "/archive/release_0-test.tar.gz")
    .with_status(200)
    .with_body(&body)
    .expect(1)
    .create();
  let config = mock_source_config(&temp, &server, &body);
  let workspace = workspace_arg(&temp);

  recipe_cmd()
    .args(["source", "--config", &config, "--workspace", &workspace])
    .assert()
    .success()
    .stdout(predicate::str::contains("Source ready"));
  mock.assert();

  let ws = Path::new(&workspace);
  assert!(ws.join("source_subfolder/src/include/nfd.h").is_file());

  // A second run reuses the verified archive without downloading again.
  recipe_cmd()
    .args(["source", "--config", &config, "--workspace", &workspace])
    .assert()
    .success();
  mock.assert();

  recipe_cmd()
    .args(["package", "--config", &config, "--workspace", &workspace])
    .args(["-s", "os=Linux"])
    .assert()
    .success()
    .stdout(predicate::str::contains("nfd gtk-3"));

  assert!(ws.join("package/licenses/LICENSE").is_file());
  assert!(ws.join("package/include/nfd.h").is_file());
  assert!(ws.join("package/lib/libnfd.a").is_file());
  assert!(ws.join("package/package_info.json").is_file());

  recipe_cmd()
    .args(["info", "--config", &config, "--workspace", &workspace])
    .assert()
    .success()
    .stdout(predicate::str::contains("nativefiledialog/0-test"));
}

#[test]
#[serial]
fn tampered_archive_is_rejected() {
  let temp = TempDir::new().unwrap();
  let body = release_tarball();
  let mut server = mockito::Server::new();
  let _mock = server
    .mock("GET", "/archive/release_0-test.tar.gz")
    .with_status(200)
    .with_body(b"not the release")
    .create();
  let config = mock_source_config(&temp, &server, &body);
  let workspace = workspace_arg(&temp);

  recipe_cmd()
    .args(["source", "--config", &config, "--workspace", &workspace])
    .assert()
    .failure()
    .stderr(predicate::str::contains("hash mismatch"));

  assert!(!Path::new(&workspace).join("source_subfolder").exists());
}
