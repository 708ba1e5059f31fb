//! Exclusive lock on a workspace.
//!
//! Two runs against the same workspace would race on the extraction
//! directory, so every mutating command holds `<workspace>/.lock` until it
//! finishes. The file records which command holds it.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::recipe::workspace::Workspace;

/// The run holding a workspace lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockHolder {
  pub pid: u32,
  pub command: String,
}

impl fmt::Display for LockHolder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "`{}` (PID {})", self.command, self.pid)
  }
}

#[derive(Debug, Error)]
pub enum WorkspaceLockError {
  #[error("workspace is locked by {holder}; if no nfd-recipe run is active, remove {}", .lock_path.display())]
  Busy { holder: String, lock_path: PathBuf },

  #[error("cannot lock {}: {source}", .lock_path.display())]
  Io { lock_path: PathBuf, source: io::Error },
}

/// Exclusive lock on a workspace, released on drop.
#[derive(Debug)]
pub struct WorkspaceLock {
  _file: File,
  lock_path: PathBuf,
}

impl WorkspaceLock {
  /// Take the lock without waiting. A held lock fails with [`WorkspaceLockError::Busy`].
  pub fn acquire(workspace: &Workspace, command: &str) -> Result<Self, WorkspaceLockError> {
    let lock_path = workspace.lock_path();
    let io_err = |source: io::Error| WorkspaceLockError::Io {
      lock_path: lock_path.clone(),
      source,
    };

    fs::create_dir_all(workspace.root()).map_err(io_err)?;

    let mut file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(&lock_path)
      .map_err(io_err)?;

    match try_lock(&file) {
      Ok(()) => {}
      Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
        return Err(WorkspaceLockError::Busy {
          holder: describe_holder(&lock_path),
          lock_path: lock_path.clone(),
        });
      }
      Err(err) => return Err(io_err(err)),
    }

    let holder = LockHolder {
      pid: std::process::id(),
      command: command.to_string(),
    };
    file.set_len(0).map_err(io_err)?;
    serde_json::to_writer(&mut file, &holder).map_err(|e| io_err(io::Error::other(e)))?;
    file.flush().map_err(io_err)?;

    debug!(path = ?lock_path, command, "workspace locked");
    Ok(Self { _file: file, lock_path })
  }

  pub fn lock_path(&self) -> &Path {
    &self.lock_path
  }
}

// Windows refuses to read a file another handle has locked.
fn describe_holder(lock_path: &Path) -> String {
  fs::read_to_string(lock_path)
    .ok()
    .and_then(|contents| serde_json::from_str::<LockHolder>(&contents).ok())
    .map_or_else(|| "another process".to_string(), |holder| holder.to_string())
}

#[cfg(unix)]
fn try_lock(file: &File) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  flock(file.as_fd(), FlockOperation::NonBlockingLockExclusive)
    .map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(windows)]
fn try_lock(file: &File) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::HANDLE;
  use windows_sys::Win32::Storage::FileSystem::{LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, LockFileEx};

  let handle = file.as_raw_handle() as HANDLE;

  // SAFETY: OVERLAPPED is valid when zero-initialized and the handle is open.
  let result = unsafe {
    let mut overlapped = std::mem::zeroed();
    LockFileEx(
      handle,
      LOCKFILE_FAIL_IMMEDIATELY | LOCKFILE_EXCLUSIVE_LOCK,
      0,
      1,
      0,
      &mut overlapped,
    )
  };

  if result == 0 {
    Err(io::Error::last_os_error())
  } else {
    Ok(())
  }
}
