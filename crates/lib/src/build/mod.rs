//! Build parameters and their resolution into build plans.
//!
//! A [`BuildParam`] is the declarative description of one product's build.
//! Resolving it for a product and version yields a [`BuildPlan`]: the rendered
//! executable name, output location, target platforms, argument list and
//! environment for the build invocation.
//!
//! Resolution is pure apart from the optional build-args script, which runs
//! through an [`Executor`](crate::script::Executor).
//!
//! # Submodules
//!
//! - [`resolve`] - plan resolution and its errors

pub mod resolve;
mod types;

pub use resolve::{LDFLAGS_FLAG, ResolveError, version_ldflags};
pub use types::*;
