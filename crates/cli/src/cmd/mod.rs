mod build;
mod create;
mod info;
mod package;
mod plan;
mod source;

pub use build::cmd_build;
pub use create::cmd_create;
pub use info::cmd_info;
pub use package::cmd_package;
pub use plan::cmd_plan;
pub use source::cmd_source;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;

use nfd_recipe_lib::config::{Overrides, RecipeConfig, parse_key_value};
use nfd_recipe_lib::host::SystemHost;
use nfd_recipe_lib::recipe::Recipe;

use crate::RecipeArgs;

/// Turn the global flags into config overrides.
pub(crate) fn overrides(args: &RecipeArgs) -> Result<Overrides> {
  let settings = args
    .settings
    .iter()
    .map(|s| parse_key_value(s))
    .collect::<Result<Vec<_>, _>>()
    .context("Invalid --setting")?;
  let options = args
    .options
    .iter()
    .map(|s| parse_key_value(s))
    .collect::<Result<Vec<_>, _>>()
    .context("Invalid --option")?;

  Ok(Overrides {
    config_file: args.config.clone(),
    workspace: args.workspace.clone(),
    settings,
    options,
  })
}

/// Resolve configuration and build a recipe that runs against the real system.
pub(crate) fn load_recipe(args: &RecipeArgs) -> Result<Recipe<SystemHost>> {
  let overrides = overrides(args)?;
  let config = RecipeConfig::load(&overrides).context("Failed to load configuration")?;
  let recipe = Recipe::new(SystemHost::new(), config).context("Invalid configuration")?;
  Ok(recipe)
}

/// Steps run strictly one after another, so a current-thread runtime is enough.
pub(crate) fn runtime() -> Result<Runtime> {
  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")
}
