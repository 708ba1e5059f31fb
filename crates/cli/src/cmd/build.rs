//! Implementation of the `nfd-recipe build` command.
//!
//! Installs system requirements and runs make against an already extracted
//! source tree. Run `nfd-recipe source` first.

use std::time::Instant;

use anyhow::{Context, Result};

use nfd_recipe_lib::sysreqs::SysreqsOutcome;

use crate::RecipeArgs;
use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success, print_warning};

use super::{load_recipe, runtime};

pub fn cmd_build(args: &RecipeArgs, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let recipe = load_recipe(args)?;
  let _lock = recipe.lock("build").context("Failed to lock workspace")?;

  let rt = runtime()?;
  let sysreqs = rt
    .block_on(recipe.system_requirements())
    .context("Failed to satisfy system requirements")?;
  if !output.is_json() {
    print_sysreqs(&sysreqs);
  }
  let (build_dir, make_config) = rt.block_on(recipe.build()).context("Build failed")?;

  if output.is_json() {
    return print_json(&serde_json::json!({
      "sysreqs": sysreqs,
      "build_dir": build_dir,
      "make_config": make_config,
    }));
  }

  print_success(&format!("Build complete in {}", format_duration(start.elapsed())));
  print_stat("Build dir", &build_dir.display().to_string());
  print_stat("Make config", &make_config.to_string());
  Ok(())
}

pub(crate) fn print_sysreqs(outcome: &SysreqsOutcome) {
  match outcome {
    SysreqsOutcome::NotRequired => {}
    SysreqsOutcome::Skipped => print_warning("System requirements skipped; GTK 3 development files must already be present"),
    SysreqsOutcome::AlreadyInstalled(pkgs) => print_info(&format!("System packages present: {}", pkgs.join(", "))),
    SysreqsOutcome::Installed(pkgs) => print_info(&format!("Installed system packages: {}", pkgs.join(", "))),
  }
}
