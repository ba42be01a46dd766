//! Ordered chain of schema versions with their upgrade functions.

use std::fmt;
use std::marker::PhantomData;

use thiserror::Error;
use tracing::debug;

use super::{Schema, decode_strict, encode};

type ValidateFn = Box<dyn Fn(&[u8]) -> Result<(), serde_yaml::Error> + Send + Sync>;
type UpgradeFn = Box<dyn Fn(&[u8]) -> Result<Vec<u8>, serde_yaml::Error> + Send + Sync>;

/// Errors from decoding or upgrading versioned configuration.
#[derive(Debug, Error)]
pub enum SchemaError {
  /// The declared or target version is not registered, or the target is
  /// older than the declared version.
  #[error("cannot upgrade {registry} configuration from version {declared} to version {target}: registered versions are 0 through {latest}")]
  UnknownVersion {
    registry: String,
    declared: u32,
    target: u32,
    latest: u32,
  },

  /// A single version transition failed.
  #[error("failed to upgrade {registry} configuration from version {from} to version {to}")]
  Migration {
    registry: String,
    from: u32,
    to: u32,
    #[source]
    source: serde_yaml::Error,
  },

  /// Bytes are not valid for the version they claim to be.
  #[error("invalid {registry} configuration for version {version}")]
  Decode {
    registry: String,
    version: u32,
    #[source]
    source: serde_yaml::Error,
  },
}

struct Version {
  validate: ValidateFn,
  upgrade_to_next: Option<UpgradeFn>,
}

/// An immutable, ordered chain of configuration versions `0..=latest`.
///
/// `L` is the latest shape. Registries are plain values: build as many as
/// needed (one per plugin, per file kind) and pass them where migration
/// happens.
pub struct Registry<L> {
  name: String,
  versions: Vec<Version>,
  _latest: PhantomData<fn() -> L>,
}

impl<L> fmt::Debug for Registry<L> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registry")
      .field("name", &self.name)
      .field("latest", &self.latest())
      .finish()
  }
}

/// Builds a [`Registry`] one version at a time.
///
/// The type parameter tracks the newest shape added so far, so each upgrade
/// function is checked against its neighbors at compile time.
pub struct RegistryBuilder<C> {
  name: String,
  versions: Vec<Version>,
  _current: PhantomData<fn() -> C>,
}

fn version_of<C: Schema>() -> Version {
  Version {
    validate: Box::new(|bytes: &[u8]| decode_strict::<C>(bytes).map(|_| ())),
    upgrade_to_next: None,
  }
}

impl Registry<()> {
  /// Start a registry whose version 0 has shape `C`.
  pub fn builder<C: Schema>(name: &str) -> RegistryBuilder<C> {
    RegistryBuilder {
      name: name.to_string(),
      versions: vec![version_of::<C>()],
      _current: PhantomData,
    }
  }
}

impl<C: Schema> RegistryBuilder<C> {
  /// Append the next version, with shape `N`, reached from the current
  /// version through `map`.
  ///
  /// Fields with no counterpart in `N` take whatever `map` assigns, usually
  /// `N`'s defaults.
  pub fn upgrade<N: Schema>(mut self, map: fn(C) -> N) -> RegistryBuilder<N> {
    if let Some(current) = self.versions.last_mut() {
      current.upgrade_to_next = Some(Box::new(move |bytes: &[u8]| {
        let config = decode_strict::<C>(bytes)?;
        encode(&map(config))
      }));
    }
    self.versions.push(version_of::<N>());
    RegistryBuilder {
      name: self.name,
      versions: self.versions,
      _current: PhantomData,
    }
  }

  /// Append a version whose shape is unchanged.
  ///
  /// The step strictly decodes its input and then passes the bytes through
  /// as-is, keeping comments and formatting.
  pub fn unchanged(mut self) -> RegistryBuilder<C> {
    if let Some(current) = self.versions.last_mut() {
      current.upgrade_to_next = Some(Box::new(|bytes: &[u8]| -> Result<Vec<u8>, serde_yaml::Error> {
        decode_strict::<C>(bytes)?;
        Ok(bytes.to_vec())
      }));
    }
    self.versions.push(version_of::<C>());
    self
  }

  /// Finish the registry with the current shape as the latest version.
  pub fn build(self) -> Registry<C> {
    Registry {
      name: self.name,
      versions: self.versions,
      _latest: PhantomData,
    }
  }
}

impl<L> Registry<L> {
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The newest registered version.
  pub fn latest(&self) -> u32 {
    // Builders always register version 0.
    (self.versions.len() - 1) as u32
  }

  pub fn contains(&self, version: u32) -> bool {
    (version as usize) < self.versions.len()
  }
}

impl<L: Schema> Registry<L> {
  /// Strictly decode bytes as the given version, discarding the result.
  pub fn validate(&self, version: u32, bytes: &[u8]) -> Result<(), SchemaError> {
    let entry = self.versions.get(version as usize).ok_or_else(|| self.unknown(version, version))?;
    (entry.validate)(bytes).map_err(|source| SchemaError::Decode {
      registry: self.name.clone(),
      version,
      source,
    })
  }

  /// Upgrade bytes of version `version` to version `version + 1`.
  ///
  /// Returns `None` for the latest version, which has no successor.
  pub fn upgrade_to_next(&self, version: u32, bytes: &[u8]) -> Option<Result<Vec<u8>, SchemaError>> {
    let upgrade = self.versions.get(version as usize)?.upgrade_to_next.as_ref()?;
    Some(upgrade(bytes).map_err(|source| SchemaError::Migration {
      registry: self.name.clone(),
      from: version,
      to: version + 1,
      source,
    }))
  }

  /// Upgrade bytes declared as `declared` to version `target`.
  ///
  /// Runs every intermediate upgrade in order and stops at the first
  /// failure. The result is strictly decoded as `target` before it is
  /// returned; when no upgrade is needed the input comes back unchanged, so
  /// upgrading twice is the same as upgrading once.
  pub fn upgrade_to(&self, declared: u32, bytes: &[u8], target: u32) -> Result<Vec<u8>, SchemaError> {
    if !self.contains(declared) || !self.contains(target) || declared > target {
      return Err(self.unknown(declared, target));
    }

    let mut current = bytes.to_vec();
    for version in declared..target {
      debug!(registry = %self.name, from = version, to = version + 1, "upgrading configuration");
      current = match self.upgrade_to_next(version, &current) {
        Some(result) => result?,
        None => return Err(self.unknown(declared, target)),
      };
    }

    self.validate(target, &current)?;
    Ok(current)
  }

  /// Upgrade bytes declared as `declared` to the latest version.
  pub fn upgrade_to_latest(&self, declared: u32, bytes: &[u8]) -> Result<Vec<u8>, SchemaError> {
    self.upgrade_to(declared, bytes, self.latest())
  }

  /// Upgrade to the latest version and decode into the latest shape.
  pub fn load(&self, declared: u32, bytes: &[u8]) -> Result<L, SchemaError> {
    let latest = self.upgrade_to_latest(declared, bytes)?;
    decode_strict::<L>(&latest).map_err(|source| SchemaError::Decode {
      registry: self.name.clone(),
      version: self.latest(),
      source,
    })
  }

  fn unknown(&self, declared: u32, target: u32) -> SchemaError {
    SchemaError::UnknownVersion {
      registry: self.name.clone(),
      declared,
      target,
      latest: self.latest(),
    }
  }
}
