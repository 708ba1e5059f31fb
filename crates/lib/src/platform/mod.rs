pub mod arch;
pub mod os;
pub mod paths;

use arch::Arch;
use os::Os;
use std::fmt;

/// Platform identifier combining architecture and OS (e.g., "Linux-x86_64")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

impl Platform {
  /// Create a new platform identifier
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// Detect the current platform at runtime
  pub fn current() -> Self {
    Self {
      arch: Arch::current(),
      os: Os::current(),
    }
  }

  /// Returns the platform string (e.g., "Linux-x86_64")
  pub fn triple(&self) -> String {
    format!("{}-{}", self.os, self.arch)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}

/// Returns true when the process runs as root.
#[cfg(unix)]
pub fn is_elevated() -> bool {
  rustix::process::geteuid().is_root()
}

/// System packages are only installed on Linux, so Windows never needs to elevate.
#[cfg(not(unix))]
pub fn is_elevated() -> bool {
  false
}
