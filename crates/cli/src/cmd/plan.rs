//! Implementation of the `distplan plan` command.
//!
//! Loads a project configuration (upgrading it from its declared schema
//! version), then resolves the build plan of each selected product.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use distplan_lib::build::BuildPlan;
use distplan_lib::platform::OsArch;
use distplan_lib::product::{ProductTaskOutputInfo, ProjectInfo};
use distplan_lib::project;
use distplan_lib::script::ShellExecutor;

use crate::output::{OutputFormat, format_list, print_info, print_json, print_stat, symbols};

pub struct PlanOptions {
  pub config: PathBuf,
  pub version: String,
  pub config_version: Option<u32>,
  pub products: Vec<String>,
  pub project_dir: Option<PathBuf>,
  pub run_scripts: bool,
  pub output: OutputFormat,
}

pub fn cmd_plan(opts: &PlanOptions) -> Result<()> {
  let bytes = fs::read(&opts.config).with_context(|| format!("Failed to read config: {}", opts.config.display()))?;

  let registry = project::registry();
  let declared = opts.config_version.unwrap_or_else(|| registry.latest());
  let config = registry
    .load(declared, &bytes)
    .with_context(|| format!("Failed to load config: {}", opts.config.display()))?;

  let mut params = config.build_params();
  if !opts.products.is_empty() {
    for product in &opts.products {
      if !params.keys().any(|id| id.as_str() == product) {
        bail!("product '{}' is not defined in {}", product, opts.config.display());
      }
    }
    params.retain(|id, _| opts.products.iter().any(|p| p == id.as_str()));
  }

  let project_dir = project_dir(&opts.config, opts.project_dir.as_deref())?;
  let project = ProjectInfo::new(project_dir, opts.version.clone());
  let default_os_archs: Vec<OsArch> = OsArch::current().into_iter().collect();
  if default_os_archs.is_empty() {
    warn!("current platform is not a known build target; products without os-archs get none");
  }

  let executor = ShellExecutor::new();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

  let mut plans: Vec<BuildPlan> = Vec::with_capacity(params.len());
  for (id, mut param) in params {
    if param.os_archs.is_empty() {
      param.os_archs = default_os_archs.clone();
    }
    let info = ProductTaskOutputInfo::new(project.clone(), id.clone());

    if opts.run_scripts {
      rt.block_on(param.run_build_script(&info, &executor))?;
    }

    debug!(product = %id, "resolving build plan");
    let plan = rt
      .block_on(param.resolve(&info, &executor))
      .with_context(|| format!("Failed to resolve build plan for {}", id))?;
    plans.push(plan);
  }

  if opts.output.is_json() {
    return print_json(&plans);
  }

  if plans.is_empty() {
    print_info("No products defined.");
    return Ok(());
  }

  for plan in &plans {
    print_info(&format!("{} {} {}", plan.product, symbols::ARROW, plan.output.build_name_template_rendered));
    print_stat("Output dir", &plan.output.build_output_dir);
    print_stat("Main package", &plan.output.main_pkg);
    print_stat("Platforms", &format_list(&plan.output.os_archs));
    print_stat("Args", &format_list(&plan.args));
    if !plan.environment.is_empty() {
      let env: Vec<String> = plan.environment.iter().map(|(k, v)| format!("{k}={v}")).collect();
      print_stat("Environment", &format_list(&env));
    }
  }

  Ok(())
}

fn project_dir(config: &Path, explicit: Option<&Path>) -> Result<PathBuf> {
  let dir = match explicit {
    Some(dir) => dir.to_path_buf(),
    None => match config.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    },
  };
  dunce::canonicalize(&dir).with_context(|| format!("Failed to resolve project directory: {}", dir.display()))
}
