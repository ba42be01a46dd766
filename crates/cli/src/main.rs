mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::cmd::{PlanOptions, cmd_info, cmd_plan, cmd_upgrade};
use crate::output::{OutputFormat, print_error};

/// distplan - resolve product build plans from versioned configuration
#[derive(Parser)]
#[command(name = "distplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve build plans for the products in a project configuration
  Plan {
    /// Path to the project configuration file
    #[arg(default_value = "dist.yml")]
    config: PathBuf,

    /// Resolved project version
    #[arg(long = "project-version", value_name = "VERSION")]
    version: String,

    /// Schema version of the configuration file (default: latest)
    #[arg(long)]
    config_version: Option<u32>,

    /// Only resolve these products (repeatable)
    #[arg(short, long = "product")]
    products: Vec<String>,

    /// Project root (default: directory containing the configuration file)
    #[arg(long)]
    project_dir: Option<PathBuf>,

    /// Run each product's pre-build script before resolving
    #[arg(long)]
    run_scripts: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Upgrade a configuration file to a newer schema version
  Upgrade {
    /// Path to the configuration file
    config: PathBuf,

    /// Kind of configuration
    #[arg(long, value_enum)]
    kind: ConfigKind,

    /// Schema version the file is written in
    #[arg(long)]
    from: u32,

    /// Target schema version (default: latest)
    #[arg(long)]
    to: Option<u32>,

    /// Rewrite the file in place instead of printing the result
    #[arg(short, long)]
    write: bool,
  },

  /// Show the platform of this machine
  Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigKind {
  Project,
  Bintray,
}

fn main() {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(err) = run(cli.command) {
    print_error(&format!("{err:#}"));
    std::process::exit(1);
  }
}

fn run(command: Commands) -> Result<()> {
  match command {
    Commands::Plan {
      config,
      version,
      config_version,
      products,
      project_dir,
      run_scripts,
      output,
    } => cmd_plan(&PlanOptions {
      config,
      version,
      config_version,
      products,
      project_dir,
      run_scripts,
      output,
    }),
    Commands::Upgrade {
      config,
      kind,
      from,
      to,
      write,
    } => cmd_upgrade(&config, kind, from, to, write),
    Commands::Info => {
      cmd_info();
      Ok(())
    }
  }
}
