//! Library-name discovery in a package's `lib/` folder.

use std::fs;
use std::path::Path;

use crate::error::Result;

const LIB_EXTENSIONS: &[&str] = &["so", "lib", "a", "dylib"];

/// Link names of the libraries in `lib_dir`, sorted and deduplicated.
///
/// `libnfd.a` and `libnfd.so` both yield `nfd`; `nfd.lib` yields `nfd`.
/// Versioned sonames such as `libnfd.so.1` are skipped because the unversioned
/// name is what the linker resolves.
pub fn collect_libs(lib_dir: &Path) -> Result<Vec<String>> {
  if !lib_dir.is_dir() {
    return Ok(Vec::new());
  }

  let mut names = Vec::new();
  for entry in fs::read_dir(lib_dir)? {
    let entry = entry?;
    if !entry.path().is_file() {
      continue;
    }
    if let Some(name) = link_name(&entry.file_name().to_string_lossy()) {
      names.push(name);
    }
  }

  names.sort();
  names.dedup();
  Ok(names)
}

fn link_name(file_name: &str) -> Option<String> {
  let (stem, ext) = file_name.rsplit_once('.')?;
  let ext = ext.to_ascii_lowercase();
  if !LIB_EXTENSIONS.contains(&ext.as_str()) || stem.is_empty() {
    return None;
  }

  let name = match ext.as_str() {
    "lib" => stem,
    _ => stem.strip_prefix("lib").filter(|s| !s.is_empty()).unwrap_or(stem),
  };
  Some(name.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn link_names() {
    assert_eq!(link_name("libnfd.a").as_deref(), Some("nfd"));
    assert_eq!(link_name("libnfd_d.so").as_deref(), Some("nfd_d"));
    assert_eq!(link_name("nfd.lib").as_deref(), Some("nfd"));
    assert_eq!(link_name("libfoo.lib").as_deref(), Some("libfoo"));
    assert_eq!(link_name("libnfd.dylib").as_deref(), Some("nfd"));
    assert_eq!(link_name("libnfd.so.1"), None);
    assert_eq!(link_name("README"), None);
  }

  #[test]
  fn collect_sorts_and_dedups() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["libnfd.a", "libnfd.so", "libnfd_d.a", "notes.txt"] {
      fs::write(temp_dir.path().join(name), b"").unwrap();
    }

    assert_eq!(collect_libs(temp_dir.path()).unwrap(), vec!["nfd", "nfd_d"]);
  }

  #[test]
  fn missing_dir_yields_nothing() {
    let temp_dir = TempDir::new().unwrap();
    assert!(collect_libs(&temp_dir.path().join("lib")).unwrap().is_empty());
  }
}
