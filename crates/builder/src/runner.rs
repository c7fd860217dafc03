//! External process invocation

use async_trait::async_trait;
use hcb_errors::{BuildError, Error};
use std::process::Stdio;
use tokio::process::Command;

/// Outcome of an external build command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildCommandResult {
    pub success: bool,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl BuildCommandResult {
    /// Result of a process that exited with `code`
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        Self {
            success: code == 0,
            exit_code: Some(code),
        }
    }
}

/// Runs the external packaging command
///
/// Implementations wait for the command to finish before returning. A
/// non-zero exit is reported through [`BuildCommandResult`], not as an error;
/// errors are reserved for commands that could not be run at all.
#[async_trait]
pub trait BuildRunner: Send + Sync {
    /// Run `program` with `args` to completion
    async fn run(&self, program: &str, args: &[String]) -> Result<BuildCommandResult, Error>;
}

/// Spawns the real process, streaming its output to ours
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl BuildRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<BuildCommandResult, Error> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let status = cmd.status().await.map_err(|e| BuildError::SpawnFailed {
            program: program.to_string(),
            message: e.to_string(),
        })?;

        Ok(BuildCommandResult {
            success: status.success(),
            exit_code: status.code(),
        })
    }
}
