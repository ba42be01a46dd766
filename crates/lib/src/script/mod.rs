//! Running user-supplied script bodies.
//!
//! Build configuration can carry scripts: one that prints supplemental build
//! arguments and one that runs as a pre-build hook. Both go through the
//! [`Executor`] capability so resolution can be tested without spawning
//! processes.

mod shell;

use std::collections::BTreeMap;
use std::future::Future;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::product::ProductTaskOutputInfo;

pub use shell::ShellExecutor;

/// Where and with which extra variables a script runs.
///
/// The process environment is always inherited; `env` is layered on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecContext {
  pub working_dir: PathBuf,
  pub env: BTreeMap<String, String>,
}

impl ExecContext {
  /// Context for scripts run on behalf of a product: the project directory
  /// as working directory plus the project variables.
  pub fn for_product(info: &ProductTaskOutputInfo) -> Self {
    Self {
      working_dir: info.project.project_dir.clone(),
      env: info.script_env(),
    }
  }
}

/// Captured result of a finished script.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecOutput {
  pub success: bool,
  /// Exit code, `None` if the process was killed by a signal.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

/// Capability to run a script body.
///
/// Implementations report launch failures as `Err`; a script that ran but
/// exited non-zero is an `Ok` with `success == false`.
pub trait Executor: Send + Sync {
  fn execute(&self, script: &str, ctx: &ExecContext) -> impl Future<Output = io::Result<ExecOutput>> + Send;
}

/// Errors from running a script.
#[derive(Debug, Error)]
pub enum ScriptError {
  /// The script could not be started.
  #[error("failed to launch script:\n{script}")]
  Launch {
    script: String,
    #[source]
    source: io::Error,
  },

  /// The script ran and exited unsuccessfully.
  #[error("script exited with code {code:?}: {stderr}\nscript:\n{script}")]
  Failed {
    script: String,
    code: Option<i32>,
    stderr: String,
  },
}

/// Run a script and require it to succeed.
///
/// An empty body is a no-op and never reaches the executor.
pub async fn run_script(
  script: &str,
  ctx: &ExecContext,
  executor: &impl Executor,
) -> Result<Option<ExecOutput>, ScriptError> {
  if script.is_empty() {
    return Ok(None);
  }

  info!(working_dir = ?ctx.working_dir, "running script");

  let output = executor
    .execute(script, ctx)
    .await
    .map_err(|source| ScriptError::Launch {
      script: script.to_string(),
      source,
    })?;

  if !output.success {
    return Err(ScriptError::Failed {
      script: script.to_string(),
      code: output.code,
      stderr: output.stderr.trim().to_string(),
    });
  }

  if !output.stderr.is_empty() {
    debug!(stderr = %output.stderr, "script stderr");
  }

  Ok(Some(output))
}

/// Run a build-args script and return one argument per non-empty output line.
///
/// The script runs in the project directory with the project variables set
/// (see [`ProductTaskOutputInfo::script_env`]). Order of lines is preserved.
pub async fn build_args_from_script(
  info: &ProductTaskOutputInfo,
  script: &str,
  executor: &impl Executor,
) -> Result<Vec<String>, ScriptError> {
  let ctx = ExecContext::for_product(info);
  let Some(output) = run_script(script, &ctx, executor).await? else {
    return Ok(Vec::new());
  };

  let args: Vec<String> = output
    .stdout
    .lines()
    .filter(|line| !line.is_empty())
    .map(str::to_string)
    .collect();

  debug!(product = %info.product, count = args.len(), "build args from script");
  Ok(args)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::product::{PRODUCT_ENV, ProjectInfo, VERSION_ENV};
  use crate::util::testutil::StubExecutor;

  fn info() -> ProductTaskOutputInfo {
    ProductTaskOutputInfo::new(ProjectInfo::new("/work/project", "1.2.3"), "svc")
  }

  #[tokio::test]
  async fn empty_script_never_reaches_executor() {
    let executor = StubExecutor::stdout("-should-not-appear\n");

    let args = build_args_from_script(&info(), "", &executor).await.unwrap();

    assert!(args.is_empty());
    assert_eq!(executor.calls(), 0);
  }

  #[tokio::test]
  async fn one_argument_per_line() {
    let executor = StubExecutor::stdout("-ldflags\n-X\nmain.year=2024\n");

    let args = build_args_from_script(&info(), "#!/bin/sh\necho ...", &executor)
      .await
      .unwrap();

    assert_eq!(args, vec!["-ldflags", "-X", "main.year=2024"]);
    assert_eq!(executor.calls(), 1);
  }

  #[tokio::test]
  async fn blank_lines_and_crlf_are_dropped() {
    let executor = StubExecutor::stdout("\n-a\r\n\r\n-b\n\n");

    let args = build_args_from_script(&info(), "echo", &executor).await.unwrap();

    assert_eq!(args, vec!["-a", "-b"]);
  }

  #[tokio::test]
  async fn script_runs_in_project_dir_with_project_env() {
    let executor = StubExecutor::stdout("");

    build_args_from_script(&info(), "echo", &executor).await.unwrap();

    let ctx = executor.last_context().unwrap();
    assert_eq!(ctx.working_dir, PathBuf::from("/work/project"));
    assert_eq!(ctx.env.get(VERSION_ENV).map(String::as_str), Some("1.2.3"));
    assert_eq!(ctx.env.get(PRODUCT_ENV).map(String::as_str), Some("svc"));
  }

  #[tokio::test]
  async fn nonzero_exit_reports_script_and_stderr() {
    let executor = StubExecutor::failing(2, "boom\n");

    let err = build_args_from_script(&info(), "exit 2", &executor).await.unwrap_err();

    match err {
      ScriptError::Failed { script, code, stderr } => {
        assert_eq!(script, "exit 2");
        assert_eq!(code, Some(2));
        assert_eq!(stderr, "boom");
      }
      other => panic!("unexpected error: {other}"),
    }
    assert_eq!(executor.calls(), 1);
  }

  #[tokio::test]
  async fn launch_failure_is_not_retried() {
    let executor = StubExecutor::unlaunchable();

    let err = build_args_from_script(&info(), "echo", &executor).await.unwrap_err();

    assert!(matches!(err, ScriptError::Launch { .. }));
    assert_eq!(executor.calls(), 1);
  }
}
