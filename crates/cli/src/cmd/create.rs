//! Implementation of the `nfd-recipe create` command.
//!
//! Runs every step in order: system requirements, source, build, package.
//! The first failing step aborts the run.

use std::time::Instant;

use anyhow::{Context, Result};

use crate::RecipeArgs;
use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_step, print_success};

use super::build::print_sysreqs;
use super::package::print_package_info;
use super::{load_recipe, runtime};

pub fn cmd_create(args: &RecipeArgs, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let recipe = load_recipe(args)?;
  let _lock = recipe.lock("create").context("Failed to lock workspace")?;

  if !output.is_json() {
    print_step(&format!("Creating package for {}", recipe.settings().platform()));
  }

  let rt = runtime()?;
  let report = rt.block_on(recipe.create()).context("Create failed")?;

  if output.is_json() {
    return print_json(&report);
  }

  print_sysreqs(&report.sysreqs);
  print_success(&format!("Package created in {}", format_duration(start.elapsed())));
  print_stat("Build dir", &report.build_dir.display().to_string());
  print_stat("Make config", &report.make_config.to_string());
  print_stat("Path", &report.package_dir.display().to_string());
  print_package_info(&report.package_info);
  Ok(())
}
