use anyhow::{Context, Result};
use serde::Serialize;

use nfd_recipe_lib::platform::{Platform, is_elevated};
use nfd_recipe_lib::recipe::{PackageInfo, load_package_info};

use crate::RecipeArgs;
use crate::output::{OutputFormat, print_json, print_stat};

use super::load_recipe;
use super::package::print_package_info;

#[derive(Serialize)]
struct Info {
  platform: String,
  elevated: bool,
  workspace: String,
  package: Option<PackageInfo>,
}

pub fn cmd_info(args: &RecipeArgs, output: OutputFormat) -> Result<()> {
  let recipe = load_recipe(args)?;
  let workspace = recipe.workspace();
  let package = load_package_info(workspace).context("Failed to read package info")?;

  let info = Info {
    platform: Platform::current().triple(),
    elevated: is_elevated(),
    workspace: workspace.root().display().to_string(),
    package,
  };

  if output.is_json() {
    return print_json(&info);
  }

  println!("System:");
  print_stat("Platform", &info.platform);
  print_stat("Elevated", &info.elevated.to_string());
  print_stat("Target", &recipe.settings().platform().to_string());
  print_stat("Workspace", &info.workspace);

  match &info.package {
    Some(pkg) => {
      println!("Package:");
      print_package_info(pkg);
    }
    None => println!("Package: not built"),
  }
  Ok(())
}
