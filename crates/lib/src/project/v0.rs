//! Legacy project configuration.
//!
//! Platforms are listed as `{os, arch}` maps and executables are always named
//! after the product.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::platform::{arch::Arch, os::Os};

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
  pub main_pkg: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub output_dir: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub build_args_script: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub version_var: String,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub environment: BTreeMap<String, String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub os_archs: Vec<OsArchEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OsArchEntry {
  pub os: Os,
  pub arch: Arch,
}
