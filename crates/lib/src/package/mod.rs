//! Artifact collection into the package layout.
//!
//! Headers keep their directory structure under `include/`. Binaries are
//! matched by file name anywhere in the source tree and flattened into
//! `lib/` or `bin/`.

pub mod libs;

use std::fs;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::Result;
use crate::platform::os::Os;

pub use libs::collect_libs;

/// A file-name pattern and the package folder matches are copied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArtifactPattern {
  pub pattern: &'static str,
  pub dst: &'static str,
}

impl ArtifactPattern {
  const fn new(pattern: &'static str, dst: &'static str) -> Self {
    Self { pattern, dst }
  }
}

/// Compiled artifact patterns for one OS.
///
/// File names are compared case-insensitively on Windows, where `NFD.DLL`
/// and `nfd.dll` name the same file.
#[derive(Debug, Clone)]
pub struct ArtifactMatcher {
  patterns: &'static [ArtifactPattern],
  set: GlobSet,
}

impl ArtifactMatcher {
  pub fn for_os(os: &Os) -> Result<Self> {
    let patterns = artifact_patterns(os);
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
      builder.add(GlobBuilder::new(pattern.pattern).case_insensitive(os.is_windows()).build()?);
    }

    Ok(Self {
      patterns,
      set: builder.build()?,
    })
  }

  /// First pattern matching `file_name`, in declaration order.
  pub fn find(&self, file_name: &str) -> Option<&ArtifactPattern> {
    self.set.matches(file_name).into_iter().min().map(|i| &self.patterns[i])
  }
}

/// Binary patterns collected for an OS.
pub fn artifact_patterns(os: &Os) -> &'static [ArtifactPattern] {
  const WINDOWS: &[ArtifactPattern] = &[ArtifactPattern::new("*.dll", "bin"), ArtifactPattern::new("*.lib", "lib")];
  const LINUX: &[ArtifactPattern] = &[ArtifactPattern::new("*.a", "lib"), ArtifactPattern::new("*.so*", "lib")];
  const MACOS: &[ArtifactPattern] = &[ArtifactPattern::new("*.a", "lib"), ArtifactPattern::new("*.dylib", "lib")];
  const ALL: &[ArtifactPattern] = &[
    ArtifactPattern::new("*.dll", "bin"),
    ArtifactPattern::new("*.lib", "lib"),
    ArtifactPattern::new("*.a", "lib"),
    ArtifactPattern::new("*.so*", "lib"),
    ArtifactPattern::new("*.dylib", "lib"),
  ];

  match os {
    Os::Windows => WINDOWS,
    Os::Linux => LINUX,
    Os::MacOs => MACOS,
    Os::Other(_) => ALL,
  }
}

/// Files copied into the package, relative to the package folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSet {
  pub licenses: Vec<PathBuf>,
  pub headers: Vec<PathBuf>,
  pub libraries: Vec<PathBuf>,
  pub binaries: Vec<PathBuf>,
}

impl ArtifactSet {
  pub fn len(&self) -> usize {
    self.licenses.len() + self.headers.len() + self.libraries.len() + self.binaries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Copy the license, public headers and built binaries into `package_dir`.
///
/// Any previous contents of `package_dir` are removed first.
pub fn collect_artifacts(os: &Os, source_root: &Path, package_dir: &Path) -> Result<ArtifactSet> {
  if package_dir.exists() {
    fs::remove_dir_all(package_dir)?;
  }
  fs::create_dir_all(package_dir)?;

  let mut artifacts = ArtifactSet::default();

  let license = source_root.join("LICENSE");
  if license.is_file() {
    let rel = Path::new("licenses").join("LICENSE");
    copy_into(&license, &package_dir.join(&rel))?;
    artifacts.licenses.push(rel);
  } else {
    warn!(path = ?license, "license file not found");
  }

  artifacts.headers = collect_headers(&source_root.join("src").join("include"), package_dir)?;

  let matcher = ArtifactMatcher::for_os(os)?;
  for entry in WalkDir::new(source_root).sort_by_file_name() {
    let entry = entry.map_err(std::io::Error::other)?;
    // symlinked sonames (libnfd.so -> libnfd.so.1) are copied by content
    let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file());
    if !is_file {
      continue;
    }
    let Some(name) = entry.file_name().to_str() else {
      continue;
    };
    let Some(pattern) = matcher.find(name) else {
      continue;
    };

    let rel = Path::new(pattern.dst).join(name);
    let target = package_dir.join(&rel);
    if target.exists() {
      warn!(path = ?entry.path(), "overwriting artifact with the same file name");
    }
    copy_into(entry.path(), &target)?;
    debug!(from = ?entry.path(), to = ?rel, "collected artifact");

    let list = if pattern.dst == "bin" {
      &mut artifacts.binaries
    } else {
      &mut artifacts.libraries
    };
    if !list.contains(&rel) {
      list.push(rel);
    }
  }

  info!(
    headers = artifacts.headers.len(),
    libraries = artifacts.libraries.len(),
    binaries = artifacts.binaries.len(),
    "collected artifacts"
  );

  Ok(artifacts)
}

fn collect_headers(include_root: &Path, package_dir: &Path) -> Result<Vec<PathBuf>> {
  if !include_root.is_dir() {
    warn!(path = ?include_root, "include folder not found");
    return Ok(Vec::new());
  }

  let mut headers = Vec::new();
  for entry in WalkDir::new(include_root).sort_by_file_name() {
    let entry = entry.map_err(std::io::Error::other)?;
    if !entry.file_type().is_file() {
      continue;
    }
    let relative = entry.path().strip_prefix(include_root).map_err(std::io::Error::other)?;
    let rel = Path::new("include").join(relative);
    copy_into(entry.path(), &package_dir.join(&rel))?;
    headers.push(rel);
  }

  Ok(headers)
}

fn copy_into(from: &Path, to: &Path) -> Result<()> {
  if let Some(parent) = to.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::copy(from, to)?;
  Ok(())
}
