//! Test utilities for distplan-lib.
//!
//! Provides a scripted [`Executor`] so script-driven code can be tested
//! without spawning processes.

use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::script::{ExecContext, ExecOutput, Executor};

enum Reply {
  Output(ExecOutput),
  LaunchError,
}

/// Executor that returns a canned reply and records every call.
pub struct StubExecutor {
  reply: Reply,
  calls: AtomicUsize,
  scripts: Mutex<Vec<String>>,
  last_context: Mutex<Option<ExecContext>>,
}

impl StubExecutor {
  fn new(reply: Reply) -> Self {
    Self {
      reply,
      calls: AtomicUsize::new(0),
      scripts: Mutex::new(Vec::new()),
      last_context: Mutex::new(None),
    }
  }

  /// Succeeds with the given stdout.
  pub fn stdout(stdout: &str) -> Self {
    Self::new(Reply::Output(ExecOutput {
      success: true,
      code: Some(0),
      stdout: stdout.to_string(),
      stderr: String::new(),
    }))
  }

  /// Exits with `code` and the given stderr.
  pub fn failing(code: i32, stderr: &str) -> Self {
    Self::new(Reply::Output(ExecOutput {
      success: false,
      code: Some(code),
      stdout: String::new(),
      stderr: stderr.to_string(),
    }))
  }

  /// Fails as if the interpreter could not be started.
  pub fn unlaunchable() -> Self {
    Self::new(Reply::LaunchError)
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn scripts(&self) -> Vec<String> {
    self.scripts.lock().unwrap().clone()
  }

  pub fn last_context(&self) -> Option<ExecContext> {
    self.last_context.lock().unwrap().clone()
  }
}

impl Executor for StubExecutor {
  async fn execute(&self, script: &str, ctx: &ExecContext) -> io::Result<ExecOutput> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.scripts.lock().unwrap().push(script.to_string());
    *self.last_context.lock().unwrap() = Some(ctx.clone());

    match &self.reply {
      Reply::Output(output) => Ok(output.clone()),
      Reply::LaunchError => Err(io::Error::new(io::ErrorKind::NotFound, "interpreter not found")),
    }
  }
}
