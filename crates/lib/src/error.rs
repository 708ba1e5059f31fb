//! Error types for recipe execution.

use std::path::PathBuf;

use thiserror::Error;

use crate::workspace_lock::WorkspaceLockError;

/// Errors that can occur while configuring, building or packaging.
///
/// Every variant aborts the run; nothing is retried.
#[derive(Debug, Error)]
pub enum RecipeError {
  /// Option and platform combination is not supported.
  #[error("invalid configuration: {0}")]
  InvalidConfiguration(String),

  /// The target OS has no make folder.
  #[error("unsupported platform: os={os}")]
  UnsupportedPlatform { os: String },

  /// No pinned hash exists for the requested version.
  #[error("no pinned sha256 for version {version}; set source.sha256 explicitly")]
  UnknownVersion { version: String },

  /// HTTP request failed while downloading.
  #[error("fetch failed for {url}: {message}")]
  FetchFailed { url: String, message: String },

  /// SHA256 hash mismatch after download.
  #[error("hash mismatch for {url}: expected {expected}, got {actual}")]
  HashMismatch {
    url: String,
    expected: String,
    actual: String,
  },

  /// The archive did not contain the expected top-level directory.
  #[error("archive did not contain expected directory {expected}")]
  SourceLayout { expected: String },

  /// A build step ran before the source was fetched.
  #[error("source tree not found at {}; run `source` first", .path.display())]
  SourceMissing { path: PathBuf },

  /// External command exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}")]
  CmdFailed { cmd: String, code: Option<i32> },

  /// Required system packages are not installed and installation is disabled.
  #[error("missing system packages: {}", .packages.join(", "))]
  MissingSystemPackages { packages: Vec<String> },

  /// No supported package manager was found on PATH.
  #[error("no supported system package manager found; set sysreqs.mode = \"disabled\" to skip")]
  NoSystemPackageManager,

  /// The package folder contains no libraries to link against.
  #[error("no libraries found in {}", .path.display())]
  NoLibrariesCollected { path: PathBuf },

  /// Configuration file could not be parsed.
  #[error("failed to parse config {}: {message}", .path.display())]
  Config { path: PathBuf, message: String },

  /// An artifact glob failed to compile.
  #[error("invalid artifact pattern: {0}")]
  Pattern(#[from] globset::Error),

  #[error(transparent)]
  Lock(#[from] WorkspaceLockError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

/// Result type for recipe operations.
pub type Result<T> = std::result::Result<T, RecipeError>;
