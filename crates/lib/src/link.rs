//! Link metadata published to consumers of the package.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::{GTK_FIXED_LIB, GTK_PKG_CONFIG_MODULE};
use crate::error::{RecipeError, Result};
use crate::host::{CommandSpec, Host, run_checked};
use crate::package::collect_libs;
use crate::recipe::options::Options;
use crate::recipe::settings::Settings;

/// How GTK link names are determined for the default Linux backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolkitLinkMode {
  /// Ask `pkg-config --libs gtk+-3.0`.
  #[default]
  PkgConfig,
  /// Link the single library `gtk-3`.
  Fixed,
}

/// Everything a consumer needs to link against the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetadata {
  /// Library names in link order: packaged libraries first, then toolkit libraries.
  pub libs: Vec<String>,
  /// Extra linker flags reported by pkg-config that are not `-l` entries.
  #[serde(default)]
  pub link_flags: Vec<String>,
  pub include_dirs: Vec<String>,
  pub lib_dirs: Vec<String>,
  pub bin_dirs: Vec<String>,
}

impl LinkMetadata {
  fn new(libs: Vec<String>) -> Self {
    Self {
      libs,
      link_flags: Vec::new(),
      include_dirs: vec!["include".to_string()],
      lib_dirs: vec!["lib".to_string()],
      bin_dirs: vec!["bin".to_string()],
    }
  }

  fn push_lib(&mut self, name: String) {
    if !self.libs.contains(&name) {
      self.libs.push(name);
    }
  }
}

/// Split `pkg-config --libs` output into library names and other flags.
///
/// Tokens are separated by whitespace; empty tokens are dropped. `-lgtk-3`
/// contributes `gtk-3`, anything else (`-pthread`, `-L/opt/lib`) is a flag.
pub fn parse_pkg_config_libs(output: &str) -> (Vec<String>, Vec<String>) {
  let mut libs = Vec::new();
  let mut flags = Vec::new();

  for token in output.split_whitespace() {
    match token.strip_prefix("-l") {
      Some(name) if !name.is_empty() => libs.push(name.to_string()),
      _ => flags.push(token.to_string()),
    }
  }

  (libs, flags)
}

pub fn pkg_config_command() -> CommandSpec {
  CommandSpec::new("pkg-config")
    .args(["--libs", GTK_PKG_CONFIG_MODULE])
    .capture()
}

/// Compute link metadata from the packaged libraries and, for the GTK backend
/// on Linux, the toolkit's link flags.
pub async fn publish_link_metadata<H: Host>(
  host: &H,
  settings: &Settings,
  options: &Options,
  mode: ToolkitLinkMode,
  package_dir: &Path,
) -> Result<LinkMetadata> {
  let lib_dir = package_dir.join("lib");
  let libs = collect_libs(&lib_dir)?;
  if libs.is_empty() {
    return Err(RecipeError::NoLibrariesCollected { path: lib_dir });
  }

  let mut metadata = LinkMetadata::new(libs);

  if !options.use_zenity && settings.os.is_linux() {
    match mode {
      ToolkitLinkMode::Fixed => metadata.push_lib(GTK_FIXED_LIB.to_string()),
      ToolkitLinkMode::PkgConfig => {
        let output = run_checked(host, &pkg_config_command()).await?;
        let (gtk_libs, flags) = parse_pkg_config_libs(&output.stdout);
        debug!(libs = ?gtk_libs, flags = ?flags, "parsed pkg-config output");
        for lib in gtk_libs {
          metadata.push_lib(lib);
        }
        metadata.link_flags = flags;
      }
    }
  }

  info!(libs = ?metadata.libs, "link metadata ready");
  Ok(metadata)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::os::Os;
  use crate::util::testutil::FakeHost;
  use tempfile::TempDir;

  const GTK_LIBS: &str = "-lgtk-3 -lgdk-3  -lpangocairo-1.0 -pthread -lgobject-2.0 -lglib-2.0 \n";

  fn package_with(libs: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let lib_dir = temp_dir.path().join("lib");
    std::fs::create_dir_all(&lib_dir).unwrap();
    for lib in libs {
      std::fs::write(lib_dir.join(lib), b"").unwrap();
    }
    temp_dir
  }

  fn linux() -> Settings {
    let mut settings = Settings::detect();
    settings.os = Os::Linux;
    settings
  }

  fn zenity(use_zenity: bool) -> Options {
    Options {
      use_zenity,
      ..Options::default()
    }
  }

  #[test]
  fn parse_drops_empty_tokens_and_prefix() {
    let (libs, flags) = parse_pkg_config_libs(GTK_LIBS);
    assert_eq!(libs, vec!["gtk-3", "gdk-3", "pangocairo-1.0", "gobject-2.0", "glib-2.0"]);
    assert_eq!(flags, vec!["-pthread"]);
    assert!(libs.iter().all(|l| !l.is_empty()));
  }

  #[test]
  fn parse_empty_output() {
    let (libs, flags) = parse_pkg_config_libs("  \n");
    assert!(libs.is_empty());
    assert!(flags.is_empty());
  }

  #[tokio::test]
  async fn gtk_backend_appends_pkg_config_libs() {
    let package = package_with(&["libnfd.a"]);
    let host = FakeHost::new().respond_stdout("pkg-config", GTK_LIBS);

    let metadata = publish_link_metadata(&host, &linux(), &zenity(false), ToolkitLinkMode::PkgConfig, package.path())
      .await
      .unwrap();

    assert_eq!(metadata.libs[0], "nfd");
    assert!(metadata.libs.contains(&"gtk-3".to_string()));
    assert_eq!(metadata.link_flags, vec!["-pthread"]);
    assert_eq!(host.command_lines(), vec!["pkg-config --libs gtk+-3.0"]);
  }

  #[tokio::test]
  async fn fixed_mode_appends_single_name() {
    let package = package_with(&["libnfd.a"]);
    let host = FakeHost::new();

    let metadata = publish_link_metadata(&host, &linux(), &zenity(false), ToolkitLinkMode::Fixed, package.path())
      .await
      .unwrap();

    assert_eq!(metadata.libs, vec!["nfd", "gtk-3"]);
    assert!(host.commands().is_empty());
  }

  #[tokio::test]
  async fn zenity_never_links_gtk() {
    let package = package_with(&["libnfd.a"]);
    let host = FakeHost::new().respond_stdout("pkg-config", GTK_LIBS);

    for mode in [ToolkitLinkMode::PkgConfig, ToolkitLinkMode::Fixed] {
      let metadata = publish_link_metadata(&host, &linux(), &zenity(true), mode, package.path())
        .await
        .unwrap();
      assert_eq!(metadata.libs, vec!["nfd"]);
    }
    assert!(host.commands().is_empty());
  }

  #[tokio::test]
  async fn empty_package_is_an_error() {
    let package = package_with(&[]);
    let host = FakeHost::new();

    let err = publish_link_metadata(&host, &linux(), &zenity(false), ToolkitLinkMode::PkgConfig, package.path())
      .await
      .unwrap_err();

    assert!(matches!(err, RecipeError::NoLibrariesCollected { .. }));
  }

  #[tokio::test]
  async fn pkg_config_failure_propagates() {
    let package = package_with(&["libnfd.a"]);
    let host = FakeHost::new().respond("pkg-config", crate::host::CommandOutput {
      code: Some(1),
      stdout: String::new(),
      stderr: "Package gtk+-3.0 was not found".to_string(),
    });

    let err = publish_link_metadata(&host, &linux(), &zenity(false), ToolkitLinkMode::PkgConfig, package.path())
      .await
      .unwrap_err();

    assert!(matches!(err, RecipeError::CmdFailed { code: Some(1), .. }));
  }
}
