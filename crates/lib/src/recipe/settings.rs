//! Platform descriptor: the settings a recipe run is configured for.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RecipeError, Result};
use crate::platform::Platform;
use crate::platform::arch::Arch;
use crate::platform::os::Os;

/// Build type as named by the invoking package manager (`Debug`, `Release`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildType(pub String);

impl BuildType {
  /// Only the exact string `Debug` selects a debug build.
  pub fn is_debug(&self) -> bool {
    self.0 == "Debug"
  }
}

impl Default for BuildType {
  fn default() -> Self {
    Self("Release".to_string())
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compiler {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
}

impl Compiler {
  /// Default compiler for an OS; the gmake projects expect a GCC-compatible driver.
  pub fn default_for(os: &Os) -> Self {
    let name = match os {
      Os::MacOs => "apple-clang",
      _ => "gcc",
    };
    Self {
      name: name.to_string(),
      version: None,
    }
  }
}

impl fmt::Display for Compiler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.version {
      Some(version) => write!(f, "{} {}", self.name, version),
      None => write!(f, "{}", self.name),
    }
  }
}

/// Immutable description of the target a package is built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
  pub os: Os,
  pub arch: Arch,
  pub compiler: Compiler,
  pub build_type: BuildType,
}

impl Settings {
  pub fn new(os: Os, arch: Arch, compiler: Compiler, build_type: BuildType) -> Self {
    Self {
      os,
      arch,
      compiler,
      build_type,
    }
  }

  /// Settings matching the machine this process runs on.
  pub fn detect() -> Self {
    let Platform { arch, os } = Platform::current();
    let compiler = Compiler::default_for(&os);
    Self::new(os, arch, compiler, BuildType::default())
  }

  pub fn platform(&self) -> Platform {
    Platform::new(self.arch.clone(), self.os.clone())
  }

  /// Apply a `key=value` override.
  ///
  /// Recognized keys are `os`, `arch`, `compiler`, `compiler.version` and `build_type`.
  pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
    match key {
      "os" => self.os = Os::from(value),
      "arch" => self.arch = Arch::from(value),
      "compiler" => self.compiler.name = value.to_string(),
      "compiler.version" => self.compiler.version = Some(value.to_string()),
      "build_type" => self.build_type = BuildType(value.to_string()),
      _ => {
        return Err(RecipeError::InvalidConfiguration(format!("unknown setting '{}'", key)));
      }
    }
    Ok(())
  }
}
