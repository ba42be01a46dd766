//! distplan-lib: build plan resolution and versioned configuration.
//!
//! This crate turns declarative build configuration into concrete build
//! invocations:
//! - `template`: rendering of `{{Product}}`/`{{Version}}` name templates
//! - `script`: running build-args and pre-build scripts through an `Executor`
//! - `build`: `BuildParam` resolution into a `BuildPlan`
//! - `schema`: append-only chains of configuration versions with strict decoding
//! - `project`, `publisher`: the concrete configuration chains

pub mod build;
pub mod platform;
pub mod product;
pub mod project;
pub mod publisher;
pub mod schema;
pub mod script;
pub mod template;
pub mod util;
