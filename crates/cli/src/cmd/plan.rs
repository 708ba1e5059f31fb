//! Implementation of the `nfd-recipe plan` command.
//!
//! Resolves configuration and prints what a build would do. Nothing is
//! downloaded, executed or written.

use anyhow::{Context, Result};

use crate::RecipeArgs;
use crate::output::{OutputFormat, print_json, print_stat};

use super::load_recipe;

pub fn cmd_plan(args: &RecipeArgs, output: OutputFormat) -> Result<()> {
  let recipe = load_recipe(args)?;
  let plan = recipe.plan().context("Failed to plan build")?;

  if output.is_json() {
    return print_json(&plan);
  }

  let patterns: Vec<&str> = plan.artifact_patterns.iter().map(|p| p.pattern).collect();

  println!("Plan:");
  print_stat("Platform", &plan.settings.platform().to_string());
  print_stat("Compiler", &plan.settings.compiler.to_string());
  print_stat("Build type", &plan.settings.build_type.to_string());
  print_stat("use_zenity", &plan.options.use_zenity.to_string());
  print_stat(
    "fPIC",
    &plan.options.fpic.map_or_else(|| "n/a".to_string(), |v| v.to_string()),
  );
  print_stat("Source", &plan.source_url);
  print_stat("Workspace", &plan.workspace.display().to_string());
  print_stat("Build dir", &plan.build_dir.display().to_string());
  print_stat("Make config", &plan.make_config.to_string());
  print_stat("Command", &plan.make_command);
  print_stat("Requires GTK", &plan.requires_gtk.to_string());
  if !plan.system_packages.is_empty() {
    print_stat("System packages", &plan.system_packages.join(", "));
  }
  print_stat("Artifacts", &patterns.join(" "));

  Ok(())
}
