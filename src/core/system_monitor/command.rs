//! Subprocess execution with a hard time bound.
//!
//! Collaborators that shell out (`systemctl`, `journalctl`) go through
//! [`CommandRunner`] so a wedged child never stalls the refresh loop.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::{DashError, Result};

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Output of a finished child process
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs external programs on a private current-thread Tokio runtime
pub struct CommandRunner {
    runtime: tokio::runtime::Runtime,
    timeout: Duration,
}

impl CommandRunner {
    pub fn new(timeout: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .thread_name("command-runner")
            .build()?;

        Ok(Self { runtime, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `program` with `args` and capture its output.
    ///
    /// The child is killed when the timeout elapses. A non-zero exit status
    /// is not an error; callers inspect `success` themselves since
    /// `systemctl` reports inactive units through its exit code.
    pub fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let timeout = self.timeout;
        self.runtime.block_on(async move {
            let child = Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output();

            match tokio::time::timeout(timeout, child).await {
                Ok(Ok(output)) => Ok(CommandOutput {
                    success: output.status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                }),
                Ok(Err(source)) => Err(DashError::Command {
                    program: program.to_string(),
                    source,
                }),
                Err(_) => Err(DashError::Timeout {
                    what: format!("{} {}", program, args.join(" ")),
                    after: timeout,
                }),
            }
        })
    }
}
