use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::platform::OsArch;

/// Template used when a product does not configure one.
pub const DEFAULT_NAME_TEMPLATE: &str = "{{Product}}";

/// Declarative description of how to build one product.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildParam {
  /// Template for the executable name. Supports `{{Product}}` and `{{Version}}`.
  pub name_template: String,

  /// Build output directory. Executables land in
  /// `<output_dir>/<product>/<version>/<os-arch>/<rendered name>`.
  pub output_dir: String,

  /// Main package location relative to the project root (e.g., "cmd/server").
  pub main_pkg: String,

  /// Script whose output lines become supplemental build arguments.
  /// Empty means no supplemental arguments.
  pub build_args_script: String,

  /// Fully qualified variable set to the version at link time
  /// (e.g., "github.com/org/app/cmd.Version"). Empty disables injection.
  pub version_var: String,

  /// Environment overrides for the build invocation (e.g., `CGO_ENABLED=0`).
  pub environment: BTreeMap<String, String>,

  /// Pre-build hook run before the build processes start. Empty means none.
  pub script: String,

  /// Target platforms. Empty means the caller picks defaults.
  pub os_archs: Vec<OsArch>,
}

impl BuildParam {
  pub fn new(main_pkg: &str) -> Self {
    Self {
      name_template: DEFAULT_NAME_TEMPLATE.to_string(),
      main_pkg: main_pkg.to_string(),
      ..Self::default()
    }
  }

  pub fn with_name_template(mut self, template: &str) -> Self {
    self.name_template = template.to_string();
    self
  }

  pub fn with_output_dir(mut self, dir: &str) -> Self {
    self.output_dir = dir.to_string();
    self
  }

  pub fn with_build_args_script(mut self, script: &str) -> Self {
    self.build_args_script = script.to_string();
    self
  }

  pub fn with_version_var(mut self, var: &str) -> Self {
    self.version_var = var.to_string();
    self
  }

  pub fn with_env(mut self, name: &str, value: &str) -> Self {
    self.environment.insert(name.to_string(), value.to_string());
    self
  }

  pub fn with_script(mut self, script: &str) -> Self {
    self.script = script.to_string();
    self
  }

  pub fn with_os_archs(mut self, os_archs: impl IntoIterator<Item = OsArch>) -> Self {
    self.os_archs = os_archs.into_iter().collect();
    self
  }
}

/// Renderable parts of a [`BuildParam`] for one product and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutputInfo {
  pub build_name_template_rendered: String,
  pub build_output_dir: String,
  pub main_pkg: String,
  pub os_archs: Vec<OsArch>,
}

/// Everything needed to invoke the build for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
  pub product: String,
  pub version: String,
  pub output: BuildOutputInfo,
  /// Arguments for the build invocation; later arguments override earlier ones.
  pub args: Vec<String>,
  pub environment: BTreeMap<String, String>,
}
