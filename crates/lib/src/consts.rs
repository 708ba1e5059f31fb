/// Name used for config, cache and data directories.
pub const APP_NAME: &str = "nfd-recipe";

/// Upstream package name. Also the prefix of the directory inside release tarballs.
pub const PACKAGE_NAME: &str = "nativefiledialog";

pub const DEFAULT_VERSION: &str = "116";

pub const DEFAULT_HOMEPAGE: &str = "https://github.com/mlabbe/nativefiledialog";

/// Release versions with a known-good SHA-256 of their source tarball.
pub const PINNED_SOURCES: &[(&str, &str)] = &[(
  "116",
  "1BBAED79B9C499C8D2A54F40F89277E721C0894BF3048BB247D826B96DB6BC08",
)];

/// Fixed name the extracted source tree is renamed to.
pub const SOURCE_SUBFOLDER: &str = "source_subfolder";

pub const DOWNLOADS_DIR: &str = "downloads";

pub const PACKAGE_DIR: &str = "package";

pub const PACKAGE_INFO_FILENAME: &str = "package_info.json";

pub const LOCK_FILENAME: &str = ".lock";

/// pkg-config module queried for GTK link flags.
pub const GTK_PKG_CONFIG_MODULE: &str = "gtk+-3.0";

/// Link name used when GTK flags are not queried.
pub const GTK_FIXED_LIB: &str = "gtk-3";

pub const ENV_WORKSPACE: &str = "NFD_RECIPE_WORKSPACE";

pub const ENV_SYSREQUIRES_MODE: &str = "NFD_RECIPE_SYSREQUIRES_MODE";

/// Returns the pinned SHA-256 for a release version, if any.
pub fn pinned_sha256(version: &str) -> Option<&'static str> {
  PINNED_SOURCES
    .iter()
    .find(|(v, _)| *v == version)
    .map(|(_, hash)| *hash)
}
