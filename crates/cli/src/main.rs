use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use output::{OutputFormat, print_error};

/// nfd-recipe - fetch, build and package nativefiledialog
#[derive(Parser)]
#[command(name = "nfd-recipe")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(flatten)]
  recipe: RecipeArgs,

  #[command(subcommand)]
  command: Commands,
}

/// Configuration shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct RecipeArgs {
  /// Path to a TOML config file
  #[arg(long, global = true)]
  pub config: Option<PathBuf>,

  /// Workspace directory for downloads, sources and the package
  #[arg(long, global = true)]
  pub workspace: Option<PathBuf>,

  /// Override a setting, e.g. `-s os=Windows -s build_type=Debug`
  #[arg(short = 's', long = "setting", global = true, value_name = "KEY=VALUE")]
  pub settings: Vec<String>,

  /// Override an option, e.g. `-o use_zenity=True`
  #[arg(short = 'o', long = "option", global = true, value_name = "KEY=VALUE")]
  pub options: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
  /// Show what a build would do without touching anything
  Plan,

  /// Download, verify and extract the source archive
  Source,

  /// Install system requirements and run make
  Build,

  /// Copy artifacts into the package folder and publish link metadata
  Package,

  /// Run source, build and package in one go
  Create,

  /// Show platform and workspace information
  Info,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Plan => cmd::cmd_plan(&cli.recipe, cli.output),
    Commands::Source => cmd::cmd_source(&cli.recipe, cli.output),
    Commands::Build => cmd::cmd_build(&cli.recipe, cli.output),
    Commands::Package => cmd::cmd_package(&cli.recipe, cli.output),
    Commands::Create => cmd::cmd_create(&cli.recipe, cli.output),
    Commands::Info => cmd::cmd_info(&cli.recipe, cli.output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
