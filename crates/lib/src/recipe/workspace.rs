//! On-disk layout of a recipe run.

use std::path::{Path, PathBuf};

use crate::consts::{DOWNLOADS_DIR, LOCK_FILENAME, PACKAGE_DIR, PACKAGE_INFO_FILENAME, SOURCE_SUBFOLDER};

/// Directory holding downloads, the extracted source tree and the package folder.
///
/// ```text
/// <root>/
///   .lock
///   downloads/nativefiledialog-release_116.tar.gz
///   source_subfolder/
///   package/{include,lib,bin,licenses}/
///   package/package_info.json
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
  root: PathBuf,
}

impl Workspace {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn downloads_dir(&self) -> PathBuf {
    self.root.join(DOWNLOADS_DIR)
  }

  pub fn source_dir(&self) -> PathBuf {
    self.root.join(SOURCE_SUBFOLDER)
  }

  pub fn package_dir(&self) -> PathBuf {
    self.root.join(PACKAGE_DIR)
  }

  pub fn package_info_path(&self) -> PathBuf {
    self.package_dir().join(PACKAGE_INFO_FILENAME)
  }

  pub fn lock_path(&self) -> PathBuf {
    self.root.join(LOCK_FILENAME)
  }
}
