//! Current project configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::v0;
use crate::platform::OsArch;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub products: BTreeMap<String, ProductConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductConfig {
  #[serde(default)]
  pub build: BuildConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct BuildConfig {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub name_template: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub output_dir: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub main_pkg: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub build_args_script: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub version_var: String,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub environment: BTreeMap<String, String>,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub script: String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub os_archs: Vec<OsArch>,
}

/// Legacy products keep their settings; new fields start empty so the
/// defaults apply when build parameters are derived.
pub fn upgrade(legacy: v0::ProjectConfig) -> ProjectConfig {
  let products = legacy
    .products
    .into_iter()
    .map(|(id, product)| {
      let build = product.build;
      let upgraded = BuildConfig {
        name_template: String::new(),
        output_dir: build.output_dir,
        main_pkg: build.main_pkg,
        build_args_script: build.build_args_script,
        version_var: build.version_var,
        environment: build.environment,
        script: String::new(),
        os_archs: build
          .os_archs
          .into_iter()
          .map(|entry| OsArch::new(entry.os, entry.arch))
          .collect(),
      };
      (id, ProductConfig { build: upgraded })
    })
    .collect();

  ProjectConfig { products }
}
