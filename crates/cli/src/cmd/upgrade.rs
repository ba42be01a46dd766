//! Implementation of the `distplan upgrade` command.
//!
//! Reads a configuration file written in an older schema version and emits it
//! in a newer one.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use distplan_lib::schema::{Registry, Schema};
use distplan_lib::{project, publisher};

use crate::ConfigKind;
use crate::output::print_success;

pub fn cmd_upgrade(config: &Path, kind: ConfigKind, from: u32, to: Option<u32>, write: bool) -> Result<()> {
  let bytes = fs::read(config).with_context(|| format!("Failed to read config: {}", config.display()))?;

  let upgraded = match kind {
    ConfigKind::Project => upgrade_with(&project::registry(), &bytes, from, to)?,
    ConfigKind::Bintray => upgrade_with(&publisher::bintray::registry(), &bytes, from, to)?,
  };

  if write {
    if upgraded != bytes {
      fs::write(config, &upgraded).with_context(|| format!("Failed to write config: {}", config.display()))?;
      info!(path = %config.display(), "rewrote configuration");
    }
    print_success(&format!("Upgraded {}", config.display()));
  } else {
    print!("{}", String::from_utf8_lossy(&upgraded));
  }

  Ok(())
}

fn upgrade_with<L: Schema>(registry: &Registry<L>, bytes: &[u8], from: u32, to: Option<u32>) -> Result<Vec<u8>> {
  let target = to.unwrap_or_else(|| registry.latest());
  registry
    .upgrade_to(from, bytes, target)
    .with_context(|| format!("Failed to upgrade {} configuration", registry.name()))
}
