//! The recipe orchestrator.
//!
//! A [`Recipe`] owns a resolved [`RecipeConfig`] and a [`Host`] and exposes
//! each step of the pipeline:
//! - `system_requirements`: install the GTK dev package when needed
//! - `source`: fetch and extract the pinned tarball
//! - `build`: run make in the platform's make folder
//! - `package`: copy artifacts into the package layout
//! - `package_info`: publish link metadata
//!
//! `create` runs them all in order. Any failing step aborts the run.

pub mod options;
pub mod settings;
pub mod workspace;

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::build::{MakeConfig, invoke_build, make_command, select_build_directory};
use crate::config::RecipeConfig;
use crate::consts::PACKAGE_NAME;
use crate::error::{RecipeError, Result};
use crate::host::Host;
use crate::link::{LinkMetadata, publish_link_metadata};
use crate::package::{ArtifactPattern, ArtifactSet, artifact_patterns, collect_artifacts};
use crate::source::fetch_source;
use crate::sysreqs::{PackageTool, SysreqsOutcome, ensure_system_dependencies, requires_gtk};
use crate::workspace_lock::WorkspaceLock;

use options::Options;
use settings::Settings;
use workspace::Workspace;

/// Reject option/platform combinations the library cannot build.
pub fn validate(settings: &Settings, options: &Options) -> Result<()> {
  if options.use_zenity && !settings.os.is_linux() {
    return Err(RecipeError::InvalidConfiguration(
      "use_zenity=True is only valid for os=Linux".to_string(),
    ));
  }
  Ok(())
}

/// Drop options that have no meaning on the target platform.
pub fn config_options(settings: &Settings, options: Options) -> Options {
  if settings.os.is_windows() {
    Options { fpic: None, ..options }
  } else {
    options
  }
}

/// Steps a run would take, computed without side effects.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
  pub settings: Settings,
  pub options: Options,
  pub workspace: PathBuf,
  pub source_url: String,
  pub build_dir: PathBuf,
  pub make_config: MakeConfig,
  pub make_command: String,
  pub requires_gtk: bool,
  /// Packages the detected package manager would install. Empty when none is needed or found.
  pub system_packages: Vec<String>,
  pub artifact_patterns: Vec<ArtifactPattern>,
}

/// Metadata document written to `package/package_info.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
  pub name: String,
  pub version: String,
  pub settings: Settings,
  pub options: Options,
  pub artifacts: ArtifactSet,
  pub link: LinkMetadata,
}

/// Summary of a full `create` run.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReport {
  pub sysreqs: SysreqsOutcome,
  pub source_dir: PathBuf,
  pub build_dir: PathBuf,
  pub make_config: MakeConfig,
  pub package_dir: PathBuf,
  pub package_info: PackageInfo,
}

pub struct Recipe<H: Host> {
  host: H,
  config: RecipeConfig,
}

impl<H: Host> Recipe<H> {
  /// Validate the configuration and prepare a recipe.
  ///
  /// Validation happens here so an invalid combination fails before any
  /// step touches the system.
  pub fn new(host: H, mut config: RecipeConfig) -> Result<Self> {
    validate(&config.settings, &config.options)?;
    config.options = config_options(&config.settings, config.options);
    debug!(settings = ?config.settings, options = ?config.options, "recipe configured");
    Ok(Self { host, config })
  }

  pub fn host(&self) -> &H {
    &self.host
  }

  pub fn config(&self) -> &RecipeConfig {
    &self.config
  }

  pub fn settings(&self) -> &Settings {
    &self.config.settings
  }

  pub fn options(&self) -> &Options {
    &self.config.options
  }

  pub fn workspace(&self) -> &Workspace {
    &self.config.workspace
  }

  /// Take the exclusive workspace lock for `command`.
  pub fn lock(&self, command: &str) -> Result<WorkspaceLock> {
    Ok(WorkspaceLock::acquire(self.workspace(), command)?)
  }

  pub fn build_directory(&self) -> Result<PathBuf> {
    select_build_directory(&self.settings().os, self.options())
  }

  pub fn plan(&self) -> Result<BuildPlan> {
    let build_dir = self.build_directory()?;
    let make_config = MakeConfig::for_build_type(&self.settings().build_type);
    let make_command = make_command(&build_dir, make_config, self.settings(), self.options());
    let requires_gtk = requires_gtk(self.settings(), self.options());
    let system_packages = match PackageTool::detect(&self.host) {
      Some(tool) if requires_gtk => vec![tool.gtk_package().to_string()],
      _ => Vec::new(),
    };

    Ok(BuildPlan {
      settings: self.settings().clone(),
      options: *self.options(),
      workspace: self.workspace().root().to_path_buf(),
      source_url: self.config.source.url(),
      build_dir,
      make_config,
      make_command: make_command.to_string(),
      requires_gtk,
      system_packages,
      artifact_patterns: artifact_patterns(&self.settings().os).to_vec(),
    })
  }

  pub async fn system_requirements(&self) -> Result<SysreqsOutcome> {
    ensure_system_dependencies(&self.host, self.settings(), self.options(), self.config.sysreqs).await
  }

  pub async fn source(&self) -> Result<PathBuf> {
    fetch_source(&self.host, &self.config.source, self.workspace()).await
  }

  /// Run make. The source must already be extracted.
  pub async fn build(&self) -> Result<(PathBuf, MakeConfig)> {
    let build_dir = self.build_directory()?;
    self.require_source()?;

    let config = invoke_build(
      &self.host,
      self.workspace().root(),
      &build_dir,
      self.settings(),
      self.options(),
    )
    .await?;

    Ok((build_dir, config))
  }

  /// Copy artifacts into the package folder.
  pub fn package(&self) -> Result<ArtifactSet> {
    let source_dir = self.require_source()?;
    collect_artifacts(&self.settings().os, &source_dir, &self.workspace().package_dir())
  }

  /// Compute link metadata and write `package_info.json`.
  pub async fn package_info(&self, artifacts: ArtifactSet) -> Result<PackageInfo> {
    let link = publish_link_metadata(
      &self.host,
      self.settings(),
      self.options(),
      self.config.link_mode,
      &self.workspace().package_dir(),
    )
    .await?;

    let info = PackageInfo {
      name: PACKAGE_NAME.to_string(),
      version: self.config.source.version.clone(),
      settings: self.settings().clone(),
      options: *self.options(),
      artifacts,
      link,
    };

    let path = self.workspace().package_info_path();
    fs::write(&path, serde_json::to_string_pretty(&info)?)?;
    info!(path = ?path, "wrote package info");

    Ok(info)
  }

  /// Run the whole pipeline.
  pub async fn create(&self) -> Result<CreateReport> {
    let sysreqs = self.system_requirements().await?;
    let source_dir = self.source().await?;
    let (build_dir, make_config) = self.build().await?;
    let artifacts = self.package()?;
    let package_info = self.package_info(artifacts).await?;

    Ok(CreateReport {
      sysreqs,
      source_dir,
      build_dir,
      make_config,
      package_dir: self.workspace().package_dir(),
      package_info,
    })
  }

  fn require_source(&self) -> Result<PathBuf> {
    let source_dir = self.workspace().source_dir();
    if !source_dir.is_dir() {
      return Err(RecipeError::SourceMissing { path: source_dir });
    }
    Ok(source_dir)
  }
}

/// Read a previously written `package_info.json`.
pub fn load_package_info(workspace: &Workspace) -> Result<Option<PackageInfo>> {
  let path = workspace.package_info_path();
  if !path.is_file() {
    return Ok(None);
  }
  let content = fs::read_to_string(&path)?;
  Ok(Some(serde_json::from_str(&content)?))
}
