use std::fmt;

use serde::{Deserialize, Serialize};

/// Target operating system of a recipe run.
///
/// Values outside the known set are kept verbatim so they can be reported
/// when a step has no mapping for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Os {
  Linux,
  MacOs,
  Windows,
  Other(String),
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Self {
    Self::from_target_os(std::env::consts::OS)
  }

  /// Map a Rust `target_os` name such as `linux` or `macos`.
  fn from_target_os(target_os: &str) -> Self {
    match target_os {
      "linux" => Self::Linux,
      "macos" => Self::MacOs,
      "windows" => Self::Windows,
      other => Self::Other(other.to_string()),
    }
  }

  /// Returns the settings identifier for this OS (e.g. "Macos")
  pub fn as_str(&self) -> &str {
    match self {
      Self::Linux => "Linux",
      Self::MacOs => "Macos",
      Self::Windows => "Windows",
      Self::Other(name) => name,
    }
  }

  pub fn is_linux(&self) -> bool {
    matches!(self, Self::Linux)
  }

  pub fn is_windows(&self) -> bool {
    matches!(self, Self::Windows)
  }
}

/// Parse a settings value. Only the exact names `Linux`, `Macos` and
/// `Windows` are recognized; anything else is kept verbatim.
impl From<&str> for Os {
  fn from(value: &str) -> Self {
    match value {
      "Linux" => Self::Linux,
      "Macos" => Self::MacOs,
      "Windows" => Self::Windows,
      other => Self::Other(other.to_string()),
    }
  }
}

impl From<String> for Os {
  fn from(value: String) -> Self {
    Self::from(value.as_str())
  }
}

impl From<Os> for String {
  fn from(value: Os) -> Self {
    value.as_str().to_string()
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_settings_names_exactly() {
    assert_eq!(Os::from("Linux"), Os::Linux);
    assert_eq!(Os::from("Macos"), Os::MacOs);
    assert_eq!(Os::from("Windows"), Os::Windows);

    assert_eq!(Os::from("linux"), Os::Other("linux".to_string()));
    assert_eq!(Os::from("darwin"), Os::Other("darwin".to_string()));
    assert_eq!(Os::from("MacOS"), Os::Other("MacOS".to_string()));
  }

  #[test]
  fn maps_rust_target_names() {
    assert_eq!(Os::from_target_os("linux"), Os::Linux);
    assert_eq!(Os::from_target_os("macos"), Os::MacOs);
    assert_eq!(Os::from_target_os("windows"), Os::Windows);
    assert_eq!(Os::from_target_os("freebsd"), Os::Other("freebsd".to_string()));
  }

  #[test]
  fn unknown_os_is_preserved() {
    let os = Os::from("FreeBSD");
    assert_eq!(os, Os::Other("FreeBSD".to_string()));
    assert_eq!(os.to_string(), "FreeBSD");
  }

  #[test]
  fn current_matches_build_target() {
    let os = Os::current();
    #[cfg(target_os = "linux")]
    assert_eq!(os, Os::Linux);
    #[cfg(target_os = "windows")]
    assert_eq!(os, Os::Windows);
    #[cfg(target_os = "macos")]
    assert_eq!(os, Os::MacOs);
    let _ = os;
  }
}
