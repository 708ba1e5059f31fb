//! Recipe configuration.
//!
//! Values are layered, later sources winning:
//! 1. defaults detected from the running host
//! 2. the TOML config file (`--config`, or `recipe.toml` in the config dir)
//! 3. environment variables (`NFD_RECIPE_WORKSPACE`, `NFD_RECIPE_SYSREQUIRES_MODE`)
//! 4. command-line overrides (`-s key=value`, `-o key=value`, `--workspace`)
//!
//! ```toml
//! workspace = "/tmp/nfd"
//!
//! [settings]
//! os = "Linux"
//! build_type = "Debug"
//!
//! [options]
//! use_zenity = false
//! fPIC = true
//!
//! [source]
//! version = "116"
//!
//! [sysreqs]
//! mode = "verify"
//!
//! [link]
//! toolkit = "pkg-config"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::consts::{DEFAULT_HOMEPAGE, DEFAULT_VERSION, ENV_SYSREQUIRES_MODE, ENV_WORKSPACE, pinned_sha256};
use crate::error::{RecipeError, Result};
use crate::link::ToolkitLinkMode;
use crate::platform::paths::{default_config_file, default_workspace};
use crate::recipe::options::Options;
use crate::recipe::settings::Settings;
use crate::recipe::workspace::Workspace;
use crate::source::SourceSpec;
use crate::sysreqs::SysreqsMode;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
  workspace: Option<PathBuf>,
  settings: SettingsSection,
  options: OptionsSection,
  source: SourceSection,
  sysreqs: SysreqsSection,
  link: LinkSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsSection {
  os: Option<String>,
  arch: Option<String>,
  compiler: Option<String>,
  compiler_version: Option<String>,
  build_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OptionsSection {
  use_zenity: Option<bool>,
  #[serde(rename = "fPIC")]
  fpic: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SourceSection {
  version: Option<String>,
  sha256: Option<String>,
  homepage: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SysreqsSection {
  mode: Option<SysreqsMode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LinkSection {
  toolkit: Option<ToolkitLinkMode>,
}

/// Command-line overrides applied on top of file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub config_file: Option<PathBuf>,
  pub workspace: Option<PathBuf>,
  pub settings: Vec<(String, String)>,
  pub options: Vec<(String, String)>,
}

/// Fully resolved configuration for one recipe run.
#[derive(Debug, Clone)]
pub struct RecipeConfig {
  pub settings: Settings,
  pub options: Options,
  pub source: SourceSpec,
  pub sysreqs: SysreqsMode,
  pub link_mode: ToolkitLinkMode,
  pub workspace: Workspace,
}

impl RecipeConfig {
  /// Resolve configuration from all sources.
  ///
  /// An explicit `--config` path must exist; the default config file is
  /// optional.
  pub fn load(overrides: &Overrides) -> Result<Self> {
    let file = match &overrides.config_file {
      Some(path) => read_config_file(path)?,
      None => {
        let path = default_config_file();
        if path.is_file() {
          read_config_file(&path)?
        } else {
          ConfigFile::default()
        }
      }
    };

    Self::resolve(file, overrides)
  }

  /// Resolve configuration from TOML text instead of a file.
  pub fn from_toml_str(content: &str, overrides: &Overrides) -> Result<Self> {
    let file = parse_config(content, Path::new("<inline>"))?;
    Self::resolve(file, overrides)
  }

  fn resolve(file: ConfigFile, overrides: &Overrides) -> Result<Self> {
    let mut settings = Settings::detect();
    let s = &file.settings;
    let file_settings = [
      ("os", &s.os),
      ("arch", &s.arch),
      ("compiler", &s.compiler),
      ("compiler.version", &s.compiler_version),
      ("build_type", &s.build_type),
    ];
    for (key, value) in file_settings {
      if let Some(value) = value {
        settings.set(key, value)?;
      }
    }
    for (key, value) in &overrides.settings {
      settings.set(key, value)?;
    }

    let mut options = Options::default();
    if let Some(use_zenity) = file.options.use_zenity {
      options.use_zenity = use_zenity;
    }
    if let Some(fpic) = file.options.fpic {
      options.fpic = Some(fpic);
    }
    for (key, value) in &overrides.options {
      options.set(key, value)?;
    }

    let version = file.source.version.unwrap_or_else(|| DEFAULT_VERSION.to_string());
    let sha256 = match file.source.sha256 {
      Some(sha256) => sha256,
      None => pinned_sha256(&version)
        .ok_or_else(|| RecipeError::UnknownVersion {
          version: version.clone(),
        })?
        .to_string(),
    };
    let source = SourceSpec {
      homepage: file.source.homepage.unwrap_or_else(|| DEFAULT_HOMEPAGE.to_string()),
      version,
      sha256,
    };
    source.check_pin()?;

    let sysreqs = match std::env::var(ENV_SYSREQUIRES_MODE) {
      Ok(value) => value.parse()?,
      Err(_) => file.sysreqs.mode.unwrap_or_default(),
    };

    let workspace_root = overrides
      .workspace
      .clone()
      .or_else(|| std::env::var_os(ENV_WORKSPACE).map(PathBuf::from))
      .or(file.workspace)
      .unwrap_or_else(|| default_workspace(&source.version));

    Ok(Self {
      settings,
      options,
      source,
      sysreqs,
      link_mode: file.link.toolkit.unwrap_or_default(),
      workspace: Workspace::new(absolute(workspace_root)),
    })
  }
}

/// Split a `key=value` command-line argument.
pub fn parse_key_value(arg: &str) -> Result<(String, String)> {
  match arg.split_once('=') {
    Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.trim().to_string())),
    _ => Err(RecipeError::InvalidConfiguration(format!(
      "expected key=value, got '{}'",
      arg
    ))),
  }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
  debug!(path = ?path, "reading config file");
  let content = fs::read_to_string(path).map_err(|e| RecipeError::Config {
    path: path.to_path_buf(),
    message: e.to_string(),
  })?;
  parse_config(&content, path)
}

fn parse_config(content: &str, path: &Path) -> Result<ConfigFile> {
  toml::from_str(content).map_err(|e| RecipeError::Config {
    path: path.to_path_buf(),
    message: e.to_string(),
  })
}

fn absolute(path: PathBuf) -> PathBuf {
  if path.exists() {
    return dunce::canonicalize(&path).unwrap_or(path);
  }
  if path.is_absolute() {
    return path;
  }
  std::env::current_dir().map(|cwd| cwd.join(&path)).unwrap_or(path)
}
