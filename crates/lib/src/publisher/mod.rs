//! Configuration for publishing destinations.
//!
//! Only the persisted configuration lives here; uploading is done elsewhere.

pub mod bintray;

/// Connection settings shared by publishers that talk to an HTTP repository.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BasicConnectionInfo {
  pub url: String,
  pub username: String,
  pub password: String,
}
