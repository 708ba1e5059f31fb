//! Implementation of the `nfd-recipe source` command.

use std::time::Instant;

use anyhow::{Context, Result};

use crate::RecipeArgs;
use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success};

use super::{load_recipe, runtime};

pub fn cmd_source(args: &RecipeArgs, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let recipe = load_recipe(args)?;
  let _lock = recipe.lock("source").context("Failed to lock workspace")?;

  let rt = runtime()?;
  let source_dir = rt.block_on(recipe.source()).context("Failed to fetch source")?;

  if output.is_json() {
    return print_json(&serde_json::json!({ "source_dir": source_dir }));
  }

  print_success(&format!("Source ready in {}", format_duration(start.elapsed())));
  print_stat("Path", &source_dir.display().to_string());
  Ok(())
}
