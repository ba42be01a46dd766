//! Versioned configuration schemas.
//!
//! Persisted configuration evolves through an append-only chain of shapes.
//! Every shape stays decodable forever; changes are made by adding a new
//! version plus a one-way upgrade from its predecessor, never by editing an
//! old shape.
//!
//! Decoding is strict: keys a shape does not know are errors, so settings are
//! never silently dropped. Shapes opt into this with
//! `#[serde(deny_unknown_fields)]`.
//!
//! # Example
//!
//! ```
//! use distplan_lib::schema::Registry;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(deny_unknown_fields)]
//! struct V0 {
//!     #[serde(default)]
//!     host: String,
//! }
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(deny_unknown_fields)]
//! struct V1 {
//!     #[serde(default)]
//!     server: String,
//! }
//!
//! let registry = Registry::builder::<V0>("example")
//!     .upgrade(|v0: V0| V1 { server: v0.host })
//!     .build();
//!
//! let upgraded = registry.upgrade_to_latest(0, b"host: example.com\n").unwrap();
//! assert_eq!(upgraded, b"server: example.com\n");
//! ```

mod registry;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use registry::{Registry, RegistryBuilder, SchemaError};

/// A configuration shape that can take part in a registry.
pub trait Schema: Serialize + DeserializeOwned + Default + 'static {}

impl<T> Schema for T where T: Serialize + DeserializeOwned + Default + 'static {}

/// Strictly decode YAML bytes into a configuration shape.
///
/// Empty or whitespace-only input decodes to the shape's default.
pub fn decode_strict<C: Schema>(bytes: &[u8]) -> Result<C, serde_yaml::Error> {
  if bytes.iter().all(u8::is_ascii_whitespace) {
    return Ok(C::default());
  }
  serde_yaml::from_slice(bytes)
}

/// Encode a configuration shape as YAML bytes.
pub fn encode<C: Schema>(config: &C) -> Result<Vec<u8>, serde_yaml::Error> {
  serde_yaml::to_string(config).map(String::into_bytes)
}
