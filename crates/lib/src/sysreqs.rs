//! System requirements: the GTK development package for the default Linux backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{RecipeError, Result};
use crate::host::{CommandSpec, Host, run_checked};
use crate::recipe::options::Options;
use crate::recipe::settings::Settings;

/// What to do about missing system packages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SysreqsMode {
  /// Check and install what is missing.
  #[default]
  Enabled,
  /// Check only; fail if anything is missing.
  Verify,
  /// Do nothing.
  Disabled,
}

impl FromStr for SysreqsMode {
  type Err = RecipeError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "enabled" => Ok(Self::Enabled),
      "verify" => Ok(Self::Verify),
      "disabled" => Ok(Self::Disabled),
      _ => Err(RecipeError::InvalidConfiguration(format!(
        "sysreqs mode must be enabled, verify or disabled, got '{}'",
        s
      ))),
    }
  }
}

impl fmt::Display for SysreqsMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Enabled => "enabled",
      Self::Verify => "verify",
      Self::Disabled => "disabled",
    };
    write!(f, "{}", s)
  }
}

/// A Linux package manager the recipe knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageTool {
  AptGet,
  Dnf,
  Yum,
  Zypper,
  Pacman,
}

impl PackageTool {
  /// Probe order; the first tool found on PATH wins.
  pub const ALL: [PackageTool; 5] = [Self::AptGet, Self::Dnf, Self::Yum, Self::Zypper, Self::Pacman];

  pub fn detect<H: Host>(host: &H) -> Option<Self> {
    Self::ALL.into_iter().find(|tool| host.has_program(tool.program()))
  }

  pub fn program(&self) -> &'static str {
    match self {
      Self::AptGet => "apt-get",
      Self::Dnf => "dnf",
      Self::Yum => "yum",
      Self::Zypper => "zypper",
      Self::Pacman => "pacman",
    }
  }

  /// Name of the GTK 3 development package in this tool's repositories.
  pub fn gtk_package(&self) -> &'static str {
    match self {
      Self::AptGet => "libgtk-3-dev",
      Self::Dnf | Self::Yum | Self::Zypper => "gtk3-devel",
      Self::Pacman => "gtk3",
    }
  }

  fn check_command(&self, package: &str) -> CommandSpec {
    match self {
      Self::AptGet => CommandSpec::new("dpkg-query").args(["-W", "-f=${Status}", package]),
      Self::Dnf | Self::Yum | Self::Zypper => CommandSpec::new("rpm").args(["-q", package]),
      Self::Pacman => CommandSpec::new("pacman").args(["-Q", package]),
    }
    .capture()
  }

  fn update_command(&self) -> Option<CommandSpec> {
    match self {
      Self::AptGet => Some(CommandSpec::new("apt-get").arg("update")),
      _ => None,
    }
  }

  fn install_command(&self, package: &str) -> CommandSpec {
    let cmd = CommandSpec::new(self.program());
    match self {
      Self::AptGet => cmd.args(["install", "-y", "--no-install-recommends", package]),
      Self::Dnf | Self::Yum => cmd.args(["install", "-y", package]),
      Self::Zypper => cmd.args(["--non-interactive", "install", package]),
      Self::Pacman => cmd.args(["-S", "--noconfirm", package]),
    }
  }

  async fn is_installed<H: Host>(&self, host: &H, package: &str) -> Result<bool> {
    let output = host.run(&self.check_command(package)).await?;
    Ok(match self {
      // dpkg-query succeeds for removed-but-known packages too
      Self::AptGet => output.success() && output.stdout.contains("install ok installed"),
      _ => output.success(),
    })
  }
}

/// Result of the system requirements step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "packages", rename_all = "snake_case")]
pub enum SysreqsOutcome {
  /// Nothing is needed for this configuration.
  NotRequired,
  /// Mode is `disabled`.
  Skipped,
  AlreadyInstalled(Vec<String>),
  Installed(Vec<String>),
}

/// Whether the configuration links against GTK.
pub fn requires_gtk(settings: &Settings, options: &Options) -> bool {
  settings.os.is_linux() && !options.use_zenity
}

/// Ensure the GTK development package is present for the default Linux backend.
pub async fn ensure_system_dependencies<H: Host>(
  host: &H,
  settings: &Settings,
  options: &Options,
  mode: SysreqsMode,
) -> Result<SysreqsOutcome> {
  if !requires_gtk(settings, options) {
    return Ok(SysreqsOutcome::NotRequired);
  }

  if mode == SysreqsMode::Disabled {
    info!("system requirements disabled, skipping");
    return Ok(SysreqsOutcome::Skipped);
  }

  let tool = PackageTool::detect(host).ok_or(RecipeError::NoSystemPackageManager)?;
  let package = tool.gtk_package();

  if tool.is_installed(host, package).await? {
    info!(package = %package, "system package already installed");
    return Ok(SysreqsOutcome::AlreadyInstalled(vec![package.to_string()]));
  }

  if mode == SysreqsMode::Verify {
    return Err(RecipeError::MissingSystemPackages {
      packages: vec![package.to_string()],
    });
  }

  let use_sudo = !host.is_elevated() && host.has_program("sudo");
  if !use_sudo && !host.is_elevated() {
    warn!("not running as root and sudo not found; installation may fail");
  }
  let elevate = |cmd: CommandSpec| if use_sudo { cmd.wrapped_in("sudo") } else { cmd };

  if let Some(update) = tool.update_command() {
    run_checked(host, &elevate(update)).await?;
  }

  info!(tool = tool.program(), package = %package, "installing system package");
  run_checked(host, &elevate(tool.install_command(package))).await?;

  Ok(SysreqsOutcome::Installed(vec![package.to_string()]))
}
