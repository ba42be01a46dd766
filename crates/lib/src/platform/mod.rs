pub mod arch;
pub mod os;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use arch::Arch;
use os::Os;

/// Errors that can occur when parsing a platform identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OsArchError {
  #[error("invalid os-arch '{0}': expected the form <os>-<arch>")]
  Malformed(String),

  #[error("unknown operating system: {0}")]
  UnknownOs(String),

  #[error("unknown architecture: {0}")]
  UnknownArch(String),
}

/// A build target: operating system plus architecture (e.g., "linux-amd64").
///
/// The canonical string form is `<os>-<arch>` and parses back to the same
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OsArch {
  pub os: Os,
  pub arch: Arch,
}

impl OsArch {
  pub fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// Detect the current platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      os: Os::current()?,
      arch: Arch::current()?,
    })
  }

  /// Identifier used to key build outputs for this platform.
  pub fn id(&self) -> BuildOsArchId {
    BuildOsArchId {
      id: self.to_string(),
      os_arch: *self,
    }
  }
}

impl fmt::Display for OsArch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.os, self.arch)
  }
}

impl FromStr for OsArch {
  type Err = OsArchError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (os, arch) = s.split_once('-').ok_or_else(|| OsArchError::Malformed(s.to_string()))?;
    if os.is_empty() || arch.is_empty() || arch.contains('-') {
      return Err(OsArchError::Malformed(s.to_string()));
    }
    Ok(Self {
      os: os.parse()?,
      arch: arch.parse()?,
    })
  }
}

impl TryFrom<String> for OsArch {
  type Error = OsArchError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<OsArch> for String {
  fn from(value: OsArch) -> Self {
    value.to_string()
  }
}

/// Identifies the output of a build for one platform.
///
/// Always holds the canonical string form of an [`OsArch`]. Ordering is by
/// that string, so sorted ids match the order outputs are listed in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BuildOsArchId {
  id: String,
  os_arch: OsArch,
}

impl BuildOsArchId {
  pub fn as_str(&self) -> &str {
    &self.id
  }

  /// The platform this id was built from.
  pub fn os_arch(&self) -> OsArch {
    self.os_arch
  }
}

impl fmt::Display for BuildOsArchId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.id)
  }
}

impl FromStr for BuildOsArchId {
  type Err = OsArchError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(s.parse::<OsArch>()?.id())
  }
}

impl TryFrom<String> for BuildOsArchId {
  type Error = OsArchError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<BuildOsArchId> for String {
  fn from(value: BuildOsArchId) -> Self {
    value.id
  }
}

impl From<OsArch> for BuildOsArchId {
  fn from(value: OsArch) -> Self {
    value.id()
  }
}

/// Returns the platform id for the current system (e.g., "darwin-arm64")
///
/// Returns `None` if the current platform is not supported
pub fn current_os_arch_id() -> Option<BuildOsArchId> {
  OsArch::current().map(|p| p.id())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn os_arch_format() {
    let platform = OsArch::new(Os::Darwin, Arch::Arm64);
    assert_eq!(platform.to_string(), "darwin-arm64");

    let platform = OsArch::new(Os::Linux, Arch::Amd64);
    assert_eq!(platform.to_string(), "linux-amd64");
  }

  #[test]
  fn every_pair_round_trips() {
    for os in Os::ALL {
      for arch in Arch::ALL {
        let platform = OsArch::new(os, arch);
        let id = platform.id();
        assert_eq!(id.as_str().parse::<OsArch>().unwrap(), platform);
        assert_eq!(id.os_arch(), platform);
      }
    }
  }

  #[test]
  fn rejects_malformed_ids() {
    for bad in ["linux", "-amd64", "linux-", "linux-amd64-extra", ""] {
      assert!(
        matches!(bad.parse::<OsArch>(), Err(OsArchError::Malformed(_))),
        "expected '{bad}' to be rejected"
      );
    }
  }

  #[test]
  fn rejects_unknown_parts() {
    assert!(matches!("plan9-amd64".parse::<OsArch>(), Err(OsArchError::UnknownOs(_))));
    assert!(matches!("linux-mips".parse::<OsArch>(), Err(OsArchError::UnknownArch(_))));
    assert!("plan9-amd64".parse::<BuildOsArchId>().is_err());
  }

  #[test]
  fn ids_sort_by_string_form() {
    let mut ids: Vec<BuildOsArchId> = ["windows-amd64", "darwin-arm64", "linux-amd64", "darwin-amd64"]
      .iter()
      .map(|s| s.parse().unwrap())
      .collect();
    ids.sort();
    let sorted: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
    assert_eq!(sorted, vec!["darwin-amd64", "darwin-arm64", "linux-amd64", "windows-amd64"]);
  }

  #[test]
  fn serde_uses_string_form() {
    let platform = OsArch::new(Os::Linux, Arch::Arm64);
    let json = serde_json::to_string(&platform).unwrap();
    assert_eq!(json, "\"linux-arm64\"");
    assert_eq!(serde_json::from_str::<OsArch>(&json).unwrap(), platform);
    assert!(serde_json::from_str::<OsArch>("\"linux\"").is_err());
  }
}
