use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::OsArchError;

/// Operating system targets a product can be built for.
///
/// Identifiers follow the `GOOS` naming used in build invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Os {
  Darwin,
  FreeBsd,
  Linux,
  NetBsd,
  OpenBsd,
  Windows,
}

impl Os {
  pub const ALL: [Os; 6] = [
    Os::Darwin,
    Os::FreeBsd,
    Os::Linux,
    Os::NetBsd,
    Os::OpenBsd,
    Os::Windows,
  ];

  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::Darwin),
      "windows" => Some(Self::Windows),
      "freebsd" => Some(Self::FreeBsd),
      "netbsd" => Some(Self::NetBsd),
      "openbsd" => Some(Self::OpenBsd),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Darwin => "darwin",
      Self::FreeBsd => "freebsd",
      Self::Linux => "linux",
      Self::NetBsd => "netbsd",
      Self::OpenBsd => "openbsd",
      Self::Windows => "windows",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Os {
  type Err = OsArchError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|os| os.as_str() == s)
      .ok_or_else(|| OsArchError::UnknownOs(s.to_string()))
  }
}

impl TryFrom<String> for Os {
  type Error = OsArchError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Os> for String {
  fn from(value: Os) -> Self {
    value.as_str().to_string()
  }
}
