//! Product identity and per-invocation project context.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable holding the absolute project directory.
pub const PROJECT_DIR_ENV: &str = "PROJECT_DIR";
/// Environment variable holding the resolved project version.
pub const VERSION_ENV: &str = "VERSION";
/// Environment variable holding the product being processed.
pub const PRODUCT_ENV: &str = "PRODUCT";
/// Environment variable set to "true" when the version is not a release.
pub const IS_SNAPSHOT_ENV: &str = "IS_SNAPSHOT";

/// Identifier of a buildable product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for ProductId {
  fn from(id: &str) -> Self {
    Self(id.to_string())
  }
}

impl From<String> for ProductId {
  fn from(id: String) -> Self {
    Self(id)
  }
}

/// Project-wide values resolved once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
  /// Project root; scripts run with this as their working directory.
  pub project_dir: PathBuf,
  /// Resolved project version (e.g., "1.2.3" or "1.2.3-4-gabcdef").
  pub version: String,
}

impl ProjectInfo {
  pub fn new(project_dir: impl Into<PathBuf>, version: impl Into<String>) -> Self {
    Self {
      project_dir: project_dir.into(),
      version: version.into(),
    }
  }

  /// Whether the version is a snapshot rather than a release.
  pub fn is_snapshot(&self) -> bool {
    is_snapshot_version(&self.version)
  }
}

/// Context handed to per-product tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTaskOutputInfo {
  pub project: ProjectInfo,
  pub product: ProductId,
}

impl ProductTaskOutputInfo {
  pub fn new(project: ProjectInfo, product: impl Into<ProductId>) -> Self {
    Self {
      project,
      product: product.into(),
    }
  }

  /// Project variables exported to scripts run for this product.
  ///
  /// Scripts inherit the process environment; these are layered on top.
  pub fn script_env(&self) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert(
      PROJECT_DIR_ENV.to_string(),
      self.project.project_dir.to_string_lossy().into_owned(),
    );
    env.insert(VERSION_ENV.to_string(), self.project.version.clone());
    env.insert(PRODUCT_ENV.to_string(), self.product.0.clone());
    env.insert(IS_SNAPSHOT_ENV.to_string(), self.project.is_snapshot().to_string());
    env
  }
}

/// Release versions are `MAJOR.MINOR.PATCH` with an optional `-rcN` suffix.
/// Everything else (dirty trees, commits past a tag) is a snapshot.
pub fn is_snapshot_version(version: &str) -> bool {
  let (core, rc) = match version.split_once("-rc") {
    Some((core, rc)) => (core, Some(rc)),
    None => (version, None),
  };

  let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

  let parts: Vec<&str> = core.split('.').collect();
  let release_core = parts.len() == 3 && parts.iter().all(|p| all_digits(p));
  let release_rc = rc.is_none_or(all_digits);

  !(release_core && release_rc)
}
