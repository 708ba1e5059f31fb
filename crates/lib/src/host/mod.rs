//! Capability interface for everything that leaves the process.
//!
//! The recipe never spawns a process or opens a socket directly. It goes
//! through a [`Host`], which is [`SystemHost`] in production and a recording
//! fake in tests.

pub mod system;

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RecipeError, Result};

pub use system::SystemHost;

/// A command line to run on the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
  /// Variables added on top of the inherited environment.
  pub env: BTreeMap<String, String>,
  /// Capture stdout/stderr instead of streaming them to the terminal.
  pub capture: bool,
}

impl CommandSpec {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      ..Self::default()
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }

  pub fn capture(mut self) -> Self {
    self.capture = true;
    self
  }

  /// Prefix the command with another program, e.g. `sudo`.
  pub fn wrapped_in(self, program: &str) -> Self {
    let mut args = Vec::with_capacity(self.args.len() + 1);
    args.push(self.program);
    args.extend(self.args);
    Self {
      program: program.to_string(),
      args,
      ..self
    }
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// Exit status and captured output of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Side-effecting capabilities the recipe needs from its environment.
pub trait Host {
  /// Run a command to completion. A non-zero exit is not an error here.
  fn run(&self, cmd: &CommandSpec) -> impl Future<Output = Result<CommandOutput>> + Send;

  /// Download `url` to `dest`, creating parent directories.
  fn download(&self, url: &str, dest: &Path) -> impl Future<Output = Result<()>> + Send;

  /// Whether `program` can be found on PATH.
  fn has_program(&self, program: &str) -> bool;

  /// Whether the process already has administrator rights.
  fn is_elevated(&self) -> bool;
}

/// Run a command and turn a non-zero exit into [`RecipeError::CmdFailed`].
pub async fn run_checked<H: Host>(host: &H, cmd: &CommandSpec) -> Result<CommandOutput> {
  let output = host.run(cmd).await?;

  if !output.success() {
    if !output.stderr.is_empty() {
      debug!(stderr = %output.stderr, "command stderr");
    }
    if !output.stdout.is_empty() {
      debug!(stdout = %output.stdout, "command stdout");
    }

    return Err(RecipeError::CmdFailed {
      cmd: cmd.to_string(),
      code: output.code,
    });
  }

  Ok(output)
}
