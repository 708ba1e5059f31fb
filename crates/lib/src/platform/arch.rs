use std::fmt;

use serde::{Deserialize, Serialize};

/// CPU architecture of a recipe run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Arch {
  X86,
  X86_64,
  Armv8,
  Other(String),
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Self {
    Self::from(std::env::consts::ARCH)
  }

  /// Returns the settings identifier for this architecture
  pub fn as_str(&self) -> &str {
    match self {
      Self::X86 => "x86",
      Self::X86_64 => "x86_64",
      Self::Armv8 => "armv8",
      Self::Other(name) => name,
    }
  }
}

impl From<&str> for Arch {
  fn from(value: &str) -> Self {
    match value {
      "x86" => Self::X86,
      "x86_64" => Self::X86_64,
      "armv8" | "aarch64" | "arm64" => Self::Armv8,
      _ => Self::Other(value.to_string()),
    }
  }
}

impl From<String> for Arch {
  fn from(value: String) -> Self {
    Self::from(value.as_str())
  }
}

impl From<Arch> for String {
  fn from(value: Arch) -> Self {
    value.as_str().to_string()
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
