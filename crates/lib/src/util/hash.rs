//! SHA-256 helpers for verifying downloaded archives.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 of a byte slice.
pub fn hash_bytes(bytes: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  hex::encode(hasher.finalize())
}

/// Compute the lowercase hex SHA-256 of a file, streaming its contents.
pub fn hash_file(path: &Path) -> io::Result<String> {
  let mut file = File::open(path)?;
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];

  loop {
    let n = file.read(&mut buffer)?;
    if n == 0 {
      break;
    }
    hasher.update(&buffer[..n]);
  }

  Ok(hex::encode(hasher.finalize()))
}

/// Compare two hex digests ignoring case.
pub fn digests_match(expected: &str, actual: &str) -> bool {
  expected.trim().eq_ignore_ascii_case(actual.trim())
}
