use std::{fs::File, path::PathBuf};

use tokio::process::Child;
use tracing::debug;

use crate::{
    error::{ExecError, ExecResult},
    util::exit_code,
};

/// Files a detached child writes to.
#[derive(Clone, Debug)]
pub struct DetachedIo {
    pub stdout: PathBuf,
    pub stderr: PathBuf,
}

impl DetachedIo {
    /// `stdout` and `stderr` inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            stdout: dir.join("stdout"),
            stderr: dir.join("stderr"),
        }
    }

    pub(crate) fn open(&self) -> ExecResult<(File, File)> {
        Ok((create(&self.stdout)?, create(&self.stderr)?))
    }
}

fn create(path: &PathBuf) -> ExecResult<File> {
    File::create(path).map_err(|e| ExecError::Redirect {
        path: path.clone(),
        reason: e.to_string(),
    })
}

/// Handle on a child started by [`Supervisor::run_detached`](crate::Supervisor::run_detached).
#[derive(Debug)]
pub struct Detached {
    child: Child,
}

impl Detached {
    pub(crate) fn new(child: Child) -> Self {
        Self { child }
    }

    /// Exit code if the child has already finished.
    pub fn try_code(&mut self) -> ExecResult<Option<i32>> {
        Ok(self.child.try_wait()?.map(exit_code))
    }

    /// Block until the child exits.
    pub async fn wait(mut self) -> ExecResult<i32> {
        let status = self.child.wait().await?;
        let code = exit_code(status);
        debug!(target: "excon.exec", code, "detached child exited");
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Invocation, Supervisor};

    #[tokio::test]
    async fn output_lands_in_files() {
        let dir = tempfile::tempdir().unwrap();
        let io = DetachedIo::in_dir(dir.path());
        let inv = Invocation::new("sh").args(["-c", "echo out; echo err >&2; exit 7"]);

        let child = Supervisor::new().run_detached(&inv, &io).unwrap();
        assert_eq!(child.wait().await.unwrap(), 7);

        let out = std::fs::read_to_string(&io.stdout).unwrap();
        let err = std::fs::read_to_string(&io.stderr).unwrap();
        assert_eq!(out, "out\n");
        assert!(err.contains("ARGV: sh -c"));
        assert!(err.contains("err"));
    }

    #[tokio::test]
    async fn unwritable_redirect_is_reported() {
        let io = DetachedIo::in_dir("/definitely/not/here");
        let inv = Invocation::new("true");
        let err = Supervisor::new().run_detached(&inv, &io).unwrap_err();
        assert!(matches!(err, ExecError::Redirect { .. }));
    }

    #[tokio::test]
    async fn running_child_has_no_code_until_killed() {
        let dir = tempfile::tempdir().unwrap();
        let io = DetachedIo::in_dir(dir.path());
        let inv = Invocation::new("sleep").arg("5");

        let mut child = Supervisor::new().run_detached(&inv, &io).unwrap();
        assert_eq!(child.try_code().unwrap(), None);
        child.child.start_kill().unwrap();
        assert_eq!(child.wait().await.unwrap(), 128 + 9);
    }
}
