//! Test utilities for nfd-recipe-lib.
//!
//! Cross-platform shell helpers plus [`FakeHost`], a [`Host`] that records
//! every call and answers from canned responses.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::error::{RecipeError, Result};
use crate::host::{CommandOutput, CommandSpec, Host};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the command and args to echo a message.
///
/// On Unix, this uses /bin/echo directly.
/// On Windows, echo is a shell builtin, so we wrap it in cmd.exe.
#[cfg(unix)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("/bin/echo", vec![msg.to_string()])
}

#[cfg(windows)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), format!("echo {}", msg)])
}

/// Build an in-memory `.tar.gz` from `(path, contents)` pairs.
pub fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
  let encoder = GzEncoder::new(Vec::new(), Compression::default());
  let mut builder = tar::Builder::new(encoder);

  for (path, contents) in files {
    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, path, *contents).unwrap();
  }

  let mut encoder = builder.into_inner().unwrap();
  encoder.flush().unwrap();
  encoder.finish().unwrap()
}

/// A [`Host`] that never leaves the process.
///
/// Commands are matched on their program name; unmatched commands succeed
/// with empty output. Downloads serve registered bodies.
#[derive(Default)]
pub struct FakeHost {
  responses: HashMap<String, CommandOutput>,
  downloads: HashMap<String, Vec<u8>>,
  programs: HashSet<String>,
  elevated: bool,
  /// Files to create when a command runs, keyed by program.
  outputs: HashMap<String, Vec<(PathBuf, Vec<u8>)>>,
  pub commands: Mutex<Vec<CommandSpec>>,
  pub fetched: Mutex<Vec<String>>,
}

impl FakeHost {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn respond(mut self, program: &str, output: CommandOutput) -> Self {
    self.responses.insert(program.to_string(), output);
    self
  }

  pub fn respond_stdout(self, program: &str, stdout: &str) -> Self {
    self.respond(program, CommandOutput {
      code: Some(0),
      stdout: stdout.to_string(),
      stderr: String::new(),
    })
  }

  pub fn serve(mut self, url: &str, body: Vec<u8>) -> Self {
    self.downloads.insert(url.to_string(), body);
    self
  }

  pub fn with_programs(mut self, programs: &[&str]) -> Self {
    self.programs.extend(programs.iter().map(|p| p.to_string()));
    self
  }

  pub fn elevated(mut self, elevated: bool) -> Self {
    self.elevated = elevated;
    self
  }

  /// Create `path` with `contents` whenever `program` runs.
  pub fn produces(mut self, program: &str, path: impl Into<PathBuf>, contents: &[u8]) -> Self {
    self
      .outputs
      .entry(program.to_string())
      .or_default()
      .push((path.into(), contents.to_vec()));
    self
  }

  pub fn commands(&self) -> Vec<CommandSpec> {
    self.commands.lock().unwrap().clone()
  }

  pub fn command_lines(&self) -> Vec<String> {
    self.commands().iter().map(ToString::to_string).collect()
  }

  pub fn fetched(&self) -> Vec<String> {
    self.fetched.lock().unwrap().clone()
  }
}

impl Host for FakeHost {
  async fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput> {
    self.commands.lock().unwrap().push(cmd.clone());

    if let Some(files) = self.outputs.get(&cmd.program) {
      for (path, contents) in files {
        if let Some(parent) = path.parent() {
          std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
      }
    }

    Ok(self.responses.get(&cmd.program).cloned().unwrap_or(CommandOutput {
      code: Some(0),
      ..CommandOutput::default()
    }))
  }

  async fn download(&self, url: &str, dest: &Path) -> Result<()> {
    self.fetched.lock().unwrap().push(url.to_string());

    let body = self.downloads.get(url).ok_or_else(|| RecipeError::FetchFailed {
      url: url.to_string(),
      message: "HTTP 404 Not Found".to_string(),
    })?;

    if let Some(parent) = dest.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, body)?;
    Ok(())
  }

  fn has_program(&self, program: &str) -> bool {
    self.programs.contains(program)
  }

  fn is_elevated(&self) -> bool {
    self.elevated
  }
}
