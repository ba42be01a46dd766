use serde::{Deserialize, Serialize};

use crate::publisher::BasicConnectionInfo;

/// Bintray publisher configuration, version 0.
///
/// Connection keys sit at the top level next to the bintray settings. Empty
/// strings and `false` flags are omitted when encoded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub url: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub username: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub password: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub subject: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub repository: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub product: String,
  #[serde(default, skip_serializing_if = "is_false")]
  pub publish: bool,
  #[serde(default, rename = "downloads-list", skip_serializing_if = "is_false")]
  pub downloads_list: bool,
  #[serde(default, rename = "no-pom", skip_serializing_if = "is_false")]
  pub no_pom: bool,
}

impl Config {
  pub fn connection(&self) -> BasicConnectionInfo {
    BasicConnectionInfo {
      url: self.url.clone(),
      username: self.username.clone(),
      password: self.password.clone(),
    }
  }
}

fn is_false(value: &bool) -> bool {
  !*value
}
