//! Executor backed by the system shell.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

use super::{ExecContext, ExecOutput, Executor};

#[cfg(unix)]
const SCRIPT_FILE: &str = "script";
#[cfg(windows)]
const SCRIPT_FILE: &str = "script.ps1";

/// Runs scripts as real processes.
///
/// The script body is written to a file in a fresh temporary directory and
/// executed from there:
/// - a body starting with `#!` is executed directly, so its interpreter line
///   is honored
/// - any other body is run with `/bin/sh` (Unix) or `powershell.exe` (Windows)
///
/// Stdout must be UTF-8; anything else fails with `InvalidData`.
///
/// The child inherits this process's environment with the context variables
/// layered on top. There is no timeout; callers that need one should wrap the
/// returned future in `tokio::time::timeout`.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
  shell: Option<String>,
}

impl ShellExecutor {
  pub fn new() -> Self {
    Self::default()
  }

  /// Use a specific shell for scripts without an interpreter line.
  pub fn with_shell(shell: impl Into<String>) -> Self {
    Self {
      shell: Some(shell.into()),
    }
  }

  fn command(&self, script: &str, script_path: &Path) -> Command {
    if script.starts_with("#!") && self.shell.is_none() {
      return Command::new(script_path);
    }
    let (shell_cmd, shell_args) = get_shell(self.shell.as_deref());
    let mut command = Command::new(shell_cmd);
    command.args(shell_args).arg(script_path);
    command
  }
}

impl Executor for ShellExecutor {
  async fn execute(&self, script: &str, ctx: &ExecContext) -> io::Result<ExecOutput> {
    let dir = TempDir::new()?;
    let script_path = write_script(dir.path(), script)?;

    let mut command = self.command(script, &script_path);
    command.current_dir(&ctx.working_dir).envs(&ctx.env);

    debug!(script_path = ?script_path, working_dir = ?ctx.working_dir, "spawning script");

    let output = command.output().await?;

    let result = ExecOutput {
      success: output.status.success(),
      code: output.status.code(),
      stdout: String::from_utf8(output.stdout).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?,
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !result.success {
      debug!(code = ?result.code, stderr = %result.stderr, "script failed");
    }

    Ok(result)
  }
}

/// Write the body to a closed, executable file.
///
/// The handle must be closed before exec or Linux reports "text file busy".
fn write_script(dir: &Path, script: &str) -> io::Result<PathBuf> {
  let path = dir.join(SCRIPT_FILE);
  std::fs::write(&path, script)?;

  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
  }

  Ok(path)
}

/// Get the shell command and arguments used to run a script file.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  if let Some(shell) = override_shell {
    let args = if shell.contains("powershell") || shell.contains("pwsh") {
      vec!["-NoProfile".to_string(), "-File".to_string()]
    } else {
      Vec::new()
    };
    return (shell.to_string(), args);
  }

  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), Vec::new())
  }

  #[cfg(windows)]
  {
    (
      "powershell.exe".to_string(),
      vec![
        "-NoProfile".to_string(),
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
        "-File".to_string(),
      ],
    )
  }
}
