use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::OsArchError;

/// CPU architecture targets, named the way `GOARCH` names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Arch {
  I386,
  Amd64,
  Arm,
  Arm64,
  Ppc64le,
  Riscv64,
  S390x,
}

impl Arch {
  pub const ALL: [Arch; 7] = [
    Arch::I386,
    Arch::Amd64,
    Arch::Arm,
    Arch::Arm64,
    Arch::Ppc64le,
    Arch::Riscv64,
    Arch::S390x,
  ];

  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86" => Some(Self::I386),
      "x86_64" => Some(Self::Amd64),
      "arm" => Some(Self::Arm),
      "aarch64" => Some(Self::Arm64),
      "powerpc64" if cfg!(target_endian = "little") => Some(Self::Ppc64le),
      "riscv64" => Some(Self::Riscv64),
      "s390x" => Some(Self::S390x),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::I386 => "386",
      Self::Amd64 => "amd64",
      Self::Arm => "arm",
      Self::Arm64 => "arm64",
      Self::Ppc64le => "ppc64le",
      Self::Riscv64 => "riscv64",
      Self::S390x => "s390x",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = OsArchError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|arch| arch.as_str() == s)
      .ok_or_else(|| OsArchError::UnknownArch(s.to_string()))
  }
}

impl TryFrom<String> for Arch {
  type Error = OsArchError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Arch> for String {
  fn from(value: Arch) -> Self {
    value.as_str().to_string()
  }
}
