//! Host implementation backed by real processes and HTTP.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use super::{CommandOutput, CommandSpec, Host};
use crate::error::{RecipeError, Result};

/// The machine the recipe runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl SystemHost {
  pub fn new() -> Self {
    Self
  }
}

impl Host for SystemHost {
  async fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput> {
    info!(cmd = %cmd, "executing command");

    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args).envs(&cmd.env).stdin(Stdio::null());

    if let Some(cwd) = &cmd.cwd {
      command.current_dir(cwd);
    }

    debug!(program = %cmd.program, cwd = ?cmd.cwd, capture = cmd.capture, "spawning process");

    if cmd.capture {
      let output = command.output().await?;
      Ok(CommandOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      })
    } else {
      let status = command.status().await?;
      Ok(CommandOutput {
        code: status.code(),
        ..CommandOutput::default()
      })
    }
  }

  async fn download(&self, url: &str, dest: &Path) -> Result<()> {
    info!(url = %url, "fetching URL");

    if let Some(parent) = dest.parent() {
      fs::create_dir_all(parent).await?;
    }

    let response = reqwest::get(url).await.map_err(|e| RecipeError::FetchFailed {
      url: url.to_string(),
      message: e.to_string(),
    })?;

    if !response.status().is_success() {
      return Err(RecipeError::FetchFailed {
        url: url.to_string(),
        message: format!("HTTP {}", response.status()),
      });
    }

    let bytes = response.bytes().await.map_err(|e| RecipeError::FetchFailed {
      url: url.to_string(),
      message: e.to_string(),
    })?;

    let mut file = fs::File::create(dest).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;

    info!(path = ?dest, size = bytes.len(), "download complete");

    Ok(())
  }

  fn has_program(&self, program: &str) -> bool {
    find_program(program, std::env::var_os("PATH")).is_some()
  }

  fn is_elevated(&self) -> bool {
    crate::platform::is_elevated()
  }
}

/// Locate an executable `program` in the `paths` search list.
pub fn find_program(program: &str, paths: Option<OsString>) -> Option<PathBuf> {
  let cwd = std::env::current_dir().ok()?;
  let path = which::which_in(program, paths, cwd).ok()?;
  debug!(program, path = ?path, "found program");
  Some(path)
}
