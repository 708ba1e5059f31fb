//! Implementation of the `nfd-recipe package` command.

use anyhow::{Context, Result};

use nfd_recipe_lib::recipe::PackageInfo;

use crate::RecipeArgs;
use crate::output::{OutputFormat, print_json, print_stat, print_success};

use super::{load_recipe, runtime};

pub fn cmd_package(args: &RecipeArgs, output: OutputFormat) -> Result<()> {
  let recipe = load_recipe(args)?;
  let _lock = recipe.lock("package").context("Failed to lock workspace")?;

  let artifacts = recipe.package().context("Failed to collect artifacts")?;
  let rt = runtime()?;
  let info = rt
    .block_on(recipe.package_info(artifacts))
    .context("Failed to publish link metadata")?;

  if output.is_json() {
    return print_json(&info);
  }

  print_success("Package ready");
  print_stat("Path", &recipe.workspace().package_dir().display().to_string());
  print_package_info(&info);
  Ok(())
}

pub(crate) fn print_package_info(info: &PackageInfo) {
  print_stat("Package", &format!("{}/{}", info.name, info.version));
  print_stat("Licenses", &info.artifacts.licenses.len().to_string());
  print_stat("Headers", &info.artifacts.headers.len().to_string());
  print_stat("Libraries", &info.artifacts.libraries.len().to_string());
  print_stat("Binaries", &info.artifacts.binaries.len().to_string());
  print_stat("Link libs", &info.link.libs.join(" "));
  if !info.link.link_flags.is_empty() {
    print_stat("Link flags", &info.link.link_flags.join(" "));
  }
}
