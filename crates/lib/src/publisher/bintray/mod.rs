//! Bintray publisher configuration.
//!
//! Version 0 is the only, and therefore latest, version.

pub mod v0;

use crate::schema::Registry;

/// Latest bintray publisher configuration shape.
pub type Config = v0::Config;

/// Version chain for bintray publisher configuration.
pub fn registry() -> Registry<Config> {
  Registry::builder::<v0::Config>("bintray publisher").build()
}
