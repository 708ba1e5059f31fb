//! Source acquisition: download, verify and extract the release tarball.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use tar::Archive;
use tracing::{debug, info};

use crate::consts::{DEFAULT_HOMEPAGE, DEFAULT_VERSION, PACKAGE_NAME, pinned_sha256};
use crate::error::{RecipeError, Result};
use crate::host::Host;
use crate::recipe::workspace::Workspace;
use crate::util::hash::{digests_match, hash_file};

/// A versioned upstream release and the hash it must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
  pub version: String,
  pub sha256: String,
  pub homepage: String,
}

impl SourceSpec {
  /// Spec for a version with a pinned hash.
  pub fn pinned(version: &str) -> Result<Self> {
    let sha256 = pinned_sha256(version).ok_or_else(|| RecipeError::UnknownVersion {
      version: version.to_string(),
    })?;

    Ok(Self {
      version: version.to_string(),
      sha256: sha256.to_string(),
      homepage: DEFAULT_HOMEPAGE.to_string(),
    })
  }

  /// Fail when a pinned version is paired with any hash other than its pin.
  ///
  /// Only versions without a pin may take their hash from configuration.
  pub fn check_pin(&self) -> Result<()> {
    match pinned_sha256(&self.version) {
      Some(pinned) if !digests_match(pinned, &self.sha256) => Err(RecipeError::InvalidConfiguration(format!(
        "version {} is pinned to sha256 {}; refusing sha256 {}",
        self.version,
        pinned.to_ascii_lowercase(),
        self.sha256.to_ascii_lowercase()
      ))),
      _ => Ok(()),
    }
  }

  /// Archive URL: `<homepage>/archive/release_<version>.tar.gz`.
  pub fn url(&self) -> String {
    format!(
      "{}/archive/release_{}.tar.gz",
      self.homepage.trim_end_matches('/'),
      self.version
    )
  }

  pub fn archive_filename(&self) -> String {
    format!("{}-release_{}.tar.gz", PACKAGE_NAME, self.version)
  }

  /// Top-level directory inside the tarball.
  pub fn extracted_dir_name(&self) -> String {
    format!("{}-release_{}", PACKAGE_NAME, self.version)
  }
}

impl Default for SourceSpec {
  fn default() -> Self {
    Self {
      version: DEFAULT_VERSION.to_string(),
      sha256: pinned_sha256(DEFAULT_VERSION).unwrap_or_default().to_string(),
      homepage: DEFAULT_HOMEPAGE.to_string(),
    }
  }
}

/// Fetch the source archive and extract it to the workspace's source folder.
///
/// A previously downloaded archive whose hash still matches is reused. The
/// archive is verified before anything is extracted; on mismatch the file is
/// deleted and [`RecipeError::HashMismatch`] is returned.
///
/// Returns the path of the extracted source tree.
pub async fn fetch_source<H: Host>(host: &H, spec: &SourceSpec, workspace: &Workspace) -> Result<PathBuf> {
  spec.check_pin()?;

  let url = spec.url();
  let archive_path = workspace.downloads_dir().join(spec.archive_filename());

  fs::create_dir_all(workspace.root())?;

  if !cached_archive_is_valid(&archive_path, &spec.sha256) {
    host.download(&url, &archive_path).await?;
    verify_archive(&archive_path, &url, &spec.sha256)?;
  }

  let source_dir = workspace.source_dir();
  extract_source(&archive_path, workspace.root(), &spec.extracted_dir_name(), &source_dir)?;

  info!(path = ?source_dir, version = %spec.version, "source ready");
  Ok(source_dir)
}

fn cached_archive_is_valid(path: &Path, expected: &str) -> bool {
  if !path.exists() {
    return false;
  }

  debug!(path = ?path, "checking cached archive");
  match hash_file(path) {
    Ok(actual) if digests_match(expected, &actual) => {
      info!(path = ?path, "using cached archive");
      true
    }
    Ok(actual) => {
      debug!(expected = %expected, actual = %actual, "cached archive hash mismatch, re-downloading");
      false
    }
    Err(_) => false,
  }
}

fn verify_archive(path: &Path, url: &str, expected: &str) -> Result<()> {
  let actual = hash_file(path)?;

  if !digests_match(expected, &actual) {
    let _ = fs::remove_file(path);
    return Err(RecipeError::HashMismatch {
      url: url.to_string(),
      expected: expected.to_ascii_lowercase(),
      actual,
    });
  }

  debug!(hash = %actual, "archive hash verified");
  Ok(())
}

/// Extract `archive` into `root` and rename its `extracted_name` directory to `dest`.
fn extract_source(archive: &Path, root: &Path, extracted_name: &str, dest: &Path) -> Result<()> {
  let extracted = root.join(extracted_name);

  for stale in [extracted.as_path(), dest] {
    if stale.exists() {
      debug!(path = ?stale, "removing stale source tree");
      fs::remove_dir_all(stale)?;
    }
  }

  unpack_tar_gz(archive, root)?;

  if !extracted.is_dir() {
    return Err(RecipeError::SourceLayout {
      expected: extracted_name.to_string(),
    });
  }

  fs::rename(&extracted, dest)?;
  Ok(())
}

fn unpack_tar_gz(archive_path: &Path, dest: &Path) -> Result<()> {
  let file = File::open(archive_path)?;
  let decoder = GzDecoder::new(BufReader::new(file));
  let mut archive = Archive::new(decoder);

  for entry in archive.entries()? {
    let mut entry = entry?;
    // unpack_in refuses entries that would escape `dest`
    entry.unpack_in(dest)?;
  }

  info!(path = ?dest, "unpacked archive");
  Ok(())
}
