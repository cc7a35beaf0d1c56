//! Process execution utilities
//!
//! Provides a unified interface for running external commands with:
//! - Output capture
//! - Streaming output with Ctrl-C mapped to a distinct outcome

use crate::error::{exit_codes, Error, Result};
use crate::signal::InterruptGuard;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

/// Result of a command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// Exit code of the command
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl CommandResult {
    /// Create from std::process::Output
    pub fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: status_code(&output.status),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Get combined output (stdout + stderr)
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// How a streamed command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The command ran to completion with this exit code
    Exited(i32),
    /// The user pressed Ctrl-C while the command was running
    Interrupted,
}

impl StreamOutcome {
    /// Exit code to propagate from the wrapping CLI
    pub fn exit_code(self) -> i32 {
        match self {
            StreamOutcome::Exited(code) => code,
            StreamOutcome::Interrupted => exit_codes::INTERRUPTED,
        }
    }
}

fn spawn_error(program: &OsStr, err: std::io::Error) -> Error {
    let name = program.to_string_lossy();
    if err.kind() == ErrorKind::NotFound {
        Error::command_not_found(&name).with_source(err)
    } else {
        Error::process(format!("Failed to execute {}: {}", name, err)).with_source(err)
    }
}

/// Exit code of a finished process; signal deaths map to 128 + signal on Unix
fn status_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    -1
}

#[cfg(unix)]
fn killed_by_interrupt(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(nix::sys::signal::Signal::SIGINT as i32)
}

#[cfg(not(unix))]
fn killed_by_interrupt(_status: &ExitStatus) -> bool {
    false
}

/// Run a command and capture output
pub fn run_command<S: AsRef<OsStr>>(program: impl AsRef<OsStr>, args: &[S]) -> Result<CommandResult> {
    let program = program.as_ref();
    tracing::debug!(program = %program.to_string_lossy(), "running command");

    let output = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| spawn_error(program, e))?;

    Ok(CommandResult::from_output(output))
}

/// Get the path to a command
pub fn which_command(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

/// Run a command with inherited stdio in a specific directory.
///
/// While the child runs, Ctrl-C in this process is recorded instead of
/// terminating it. If the child was stopped by SIGINT, or the user interrupted
/// while it ran, the outcome is [`StreamOutcome::Interrupted`].
pub fn run_command_streaming_in_dir<S: AsRef<OsStr>>(
    program: impl AsRef<OsStr>,
    args: &[S],
    dir: &Path,
) -> Result<StreamOutcome> {
    let program = program.as_ref();
    tracing::debug!(
        program = %program.to_string_lossy(),
        dir = %dir.display(),
        "streaming command"
    );

    let guard = InterruptGuard::install()?;

    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| spawn_error(program, e))?;

    if guard.interrupted() || killed_by_interrupt(&status) {
        tracing::info!("command interrupted by user");
        return Ok(StreamOutcome::Interrupted);
    }

    Ok(StreamOutcome::Exited(status_code(&status)))
}
