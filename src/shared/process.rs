//! Bounded execution of external diagnostic commands.

use crate::shared::error::ProcessError;
use async_trait::async_trait;
use log::debug;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use which::which;

/// Timeout applied when a caller has no stricter requirement.
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Runs a program with an explicit argument vector and returns its stdout.
///
/// Arguments are never passed through a shell.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[&str], timeout_ms: u64) -> Result<String, ProcessError>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[&str], timeout_ms: u64) -> Result<String, ProcessError> {
        debug!("Running {} {:?} (timeout {} ms)", program, args, timeout_ms);

        // kill_on_drop makes the timeout below a hard kill: dropping the
        // pending output future drops the child.
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let output = match tokio::time::timeout(Duration::from_millis(timeout_ms), child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| ProcessError::Spawn {
                program: program.to_string(),
                source,
            })?,
            Err(_) => {
                return Err(ProcessError::Timeout {
                    program: program.to_string(),
                    timeout_ms,
                })
            }
        };

        if !output.status.success() {
            return Err(ProcessError::NonZeroExit {
                program: program.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ProcessError::Output {
            program: program.to_string(),
        })
    }
}

/// Check if a program resolves on PATH
pub fn command_exists(program: &str) -> bool {
    which(program).is_ok()
}
