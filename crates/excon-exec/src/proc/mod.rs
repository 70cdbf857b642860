use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

use crate::{
    Invocation,
    error::{ExecError, ExecResult},
    util::{SHELL, exit_code, shell_command},
};

mod detached;
pub use detached::{Detached, DetachedIo};

/// What a finished runtime command left behind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Captured {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    #[inline]
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs runtime commands as child processes.
#[derive(Clone, Debug, Default)]
pub struct Supervisor;

impl Supervisor {
    pub fn new() -> Self {
        Self
    }

    /// Run to completion, capturing both streams.
    ///
    /// The child's stdout never reaches ours; its stderr is captured and then
    /// replayed onto our stderr.
    pub async fn run(&self, inv: &Invocation) -> ExecResult<Captured> {
        let captured = self.capture(inv).await?;

        let mut stderr = tokio::io::stderr();
        stderr.write_all(captured.stderr.as_bytes()).await?;
        stderr.flush().await?;

        Ok(captured)
    }

    /// Like [`Supervisor::run`], without replaying stderr.
    pub async fn capture(&self, inv: &Invocation) -> ExecResult<Captured> {
        let mut cmd = shell_command(inv);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        trace!(target: "excon.exec", program = %inv.program, args = ?inv.args, "spawn");
        let child = cmd
            .spawn()
            .map_err(|e| ExecError::Spawn(format!("{SHELL}: {e}")))?;
        let output = child.wait_with_output().await?;

        let code = exit_code(output.status);
        debug!(target: "excon.exec", program = %inv.program, code, "exited");

        Ok(Captured {
            code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Start without waiting, with stdout and stderr sent to files.
    pub fn run_detached(&self, inv: &Invocation, io: &DetachedIo) -> ExecResult<Detached> {
        let (stdout, stderr) = io.open()?;

        let mut cmd = shell_command(inv);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::from(stdout));
        cmd.stderr(Stdio::from(stderr));

        trace!(target: "excon.exec", program = %inv.program, args = ?inv.args, "spawn detached");
        let child = cmd
            .spawn()
            .map_err(|e| ExecError::Spawn(format!("{SHELL}: {e}")))?;
        Ok(Detached::new(child))
    }
}
