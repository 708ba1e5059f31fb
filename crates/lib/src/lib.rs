//! nfd-recipe-lib: build orchestration for the nativefiledialog library
//!
//! This crate drives a fixed pipeline against an upstream tarball:
//! - `source`: download, verify and extract the pinned release archive
//! - `build`: pick the premake-generated make folder and run `make`
//! - `package`: copy headers, libraries and the license into a package layout
//! - `link`: publish the library names and link flags consumers need
//!
//! External processes and downloads go through the [`host::Host`] trait so the
//! orchestration in [`recipe::Recipe`] can be exercised without a network or a
//! toolchain.

pub mod build;
pub mod config;
pub mod consts;
pub mod error;
pub mod host;
pub mod link;
pub mod package;
pub mod platform;
pub mod recipe;
pub mod source;
pub mod sysreqs;
pub mod util;
pub mod workspace_lock;

pub use error::{RecipeError, Result};
