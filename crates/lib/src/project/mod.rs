//! Project build configuration and its schema versions.
//!
//! - version 0: legacy layout, see [`v0`]
//! - version 1: current layout, see [`v1`]

pub mod v0;
pub mod v1;

use std::collections::BTreeMap;

use crate::build::{BuildParam, DEFAULT_NAME_TEMPLATE};
use crate::product::ProductId;
use crate::schema::Registry;

/// Output directory used when a product does not configure one.
pub const DEFAULT_OUTPUT_DIR: &str = "out/build";

/// Latest project configuration shape.
pub type ProjectConfig = v1::ProjectConfig;

/// Version chain for project configuration.
pub fn registry() -> Registry<ProjectConfig> {
  Registry::builder::<v0::ProjectConfig>("project")
    .upgrade(v1::upgrade)
    .build()
}

impl v1::ProjectConfig {
  /// Build parameters for every product, with defaults applied.
  pub fn build_params(&self) -> BTreeMap<ProductId, BuildParam> {
    self
      .products
      .iter()
      .map(|(id, product)| (ProductId::new(id.as_str()), product.build.to_build_param()))
      .collect()
  }
}

impl v1::BuildConfig {
  pub fn to_build_param(&self) -> BuildParam {
    let or_default = |value: &str, default: &str| {
      if value.is_empty() {
        default.to_string()
      } else {
        value.to_string()
      }
    };

    BuildParam {
      name_template: or_default(&self.name_template, DEFAULT_NAME_TEMPLATE),
      output_dir: or_default(&self.output_dir, DEFAULT_OUTPUT_DIR),
      main_pkg: self.main_pkg.clone(),
      build_args_script: self.build_args_script.clone(),
      version_var: self.version_var.clone(),
      environment: self.environment.clone(),
      script: self.script.clone(),
      os_archs: self.os_archs.clone(),
    }
  }
}
