use std::process::{Output, Stdio};
use std::time::Duration;

use log::debug;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{BackupError, Result};

fn program_name(cmd: &Command) -> String {
    cmd.as_std().get_program().to_string_lossy().into_owned()
}

// Spawns the command and waits for it, killing it if it outlives the limit.
// Dropping the wait future on timeout takes the child down with it.
async fn wait_limited(mut cmd: Command, limit: Duration) -> Result<Output> {
    let program = program_name(&cmd);
    debug!("running {program} with a {}s limit", limit.as_secs());

    cmd.kill_on_drop(true);
    let child = cmd.spawn()?;
    match timeout(limit, child.wait_with_output()).await {
        Ok(output) => Ok(output?),
        Err(_) => Err(BackupError::CommandTimeout {
            program,
            seconds: limit.as_secs(),
        }),
    }
}

fn checked(program: &str, output: Output) -> Result<Output> {
    if output.status.success() {
        return Ok(output);
    }
    let code = match output.status.code() {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    };
    Err(BackupError::CommandFailed {
        program: program.to_string(),
        code,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

// Run a command with stdout and stderr captured. Stdin is closed, so
// nothing can sit waiting for input.
pub async fn run_capture(mut cmd: Command, limit: Duration) -> Result<Output> {
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    wait_limited(cmd, limit).await
}

// As run_capture, but a non-zero exit becomes an error carrying the
// command's stderr.
pub async fn run_checked(cmd: Command, limit: Duration) -> Result<Output> {
    let program = program_name(&cmd);
    let output = run_capture(cmd, limit).await?;
    checked(&program, output)
}

// Run a command whose stdin or stdout is already wired to a file, as dump
// and restore runs are. The wiring is left untouched; only stderr is
// captured, and a non-zero exit becomes an error carrying it.
pub async fn run_redirected(mut cmd: Command, limit: Duration) -> Result<Output> {
    let program = program_name(&cmd);
    cmd.stderr(Stdio::piped());
    let output = wait_limited(cmd, limit).await?;
    checked(&program, output)
}
