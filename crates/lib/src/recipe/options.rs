//! Recipe options.

use serde::{Deserialize, Serialize};

use crate::error::{RecipeError, Result};

/// Options selectable by the consumer of the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
  /// Use the zenity dialog backend instead of GTK. Linux only.
  #[serde(default)]
  pub use_zenity: bool,

  /// Build position-independent code. `None` once removed for Windows.
  #[serde(rename = "fPIC", default = "default_fpic")]
  pub fpic: Option<bool>,
}

fn default_fpic() -> Option<bool> {
  Some(true)
}

impl Default for Options {
  fn default() -> Self {
    Self {
      use_zenity: false,
      fpic: default_fpic(),
    }
  }
}

impl Options {
  /// Apply a `key=value` override such as `use_zenity=True`.
  pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
    match key {
      "use_zenity" => self.use_zenity = parse_bool(key, value)?,
      "fPIC" | "fpic" => self.fpic = Some(parse_bool(key, value)?),
      _ => {
        return Err(RecipeError::InvalidConfiguration(format!("unknown option '{}'", key)));
      }
    }
    Ok(())
  }

  pub fn fpic_enabled(&self) -> bool {
    self.fpic.unwrap_or(false)
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
  match value {
    "True" | "true" | "1" => Ok(true),
    "False" | "false" | "0" => Ok(false),
    _ => Err(RecipeError::InvalidConfiguration(format!(
      "option '{}' expects True or False, got '{}'",
      key, value
    ))),
  }
}
