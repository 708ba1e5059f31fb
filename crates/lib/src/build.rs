//! Build-directory selection and the `make` invocation.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::SOURCE_SUBFOLDER;
use crate::error::{RecipeError, Result};
use crate::host::{CommandSpec, Host, run_checked};
use crate::platform::os::Os;
use crate::recipe::options::Options;
use crate::recipe::settings::{BuildType, Settings};

/// Named make configuration of the premake-generated makefiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MakeConfig {
  DebugX64,
  ReleaseX64,
}

impl MakeConfig {
  pub fn for_build_type(build_type: &BuildType) -> Self {
    if build_type.is_debug() {
      Self::DebugX64
    } else {
      Self::ReleaseX64
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::DebugX64 => "debug_x64",
      Self::ReleaseX64 => "release_x64",
    }
  }
}

impl fmt::Display for MakeConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Make folder for a target, relative to the workspace root.
///
/// Fails with [`RecipeError::UnsupportedPlatform`] for any OS without a
/// premake project.
pub fn select_build_directory(os: &Os, options: &Options) -> Result<PathBuf> {
  let folder = match os {
    Os::Linux if options.use_zenity => "gmake_linux_zenity",
    Os::Linux => "gmake_linux",
    Os::Windows => "gmake_windows",
    Os::MacOs => "gmake_macosx",
    Os::Other(name) => {
      return Err(RecipeError::UnsupportedPlatform { os: name.clone() });
    }
  };

  Ok(Path::new(SOURCE_SUBFOLDER).join("build").join(folder))
}

/// `make config=<cfg> -C <build_dir>`, run from the workspace root.
pub fn make_command(build_dir: &Path, config: MakeConfig, settings: &Settings, options: &Options) -> CommandSpec {
  let mut cmd = CommandSpec::new("make")
    .arg(format!("config={}", config))
    .arg("-C")
    .arg(build_dir.to_string_lossy());

  if options.fpic_enabled() && !settings.os.is_windows() {
    cmd = cmd.env("CFLAGS", "-fPIC");
  }

  cmd
}

/// Run make for the selected folder. A failing make aborts the build.
pub async fn invoke_build<H: Host>(
  host: &H,
  workspace_root: &Path,
  build_dir: &Path,
  settings: &Settings,
  options: &Options,
) -> Result<MakeConfig> {
  let config = MakeConfig::for_build_type(&settings.build_type);
  let cmd = make_command(build_dir, config, settings, options).cwd(workspace_root);

  info!(config = %config, build_dir = ?build_dir, "building");
  run_checked(host, &cmd).await?;

  Ok(config)
}
