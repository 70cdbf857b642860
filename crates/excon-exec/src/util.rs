use std::process::ExitStatus;

use tokio::process::Command;

use crate::Invocation;

pub const SHELL: &str = "/bin/sh";

// Positional arguments only; the shell never parses the command line itself.
// Going through sh turns "not found" and "permission denied" into exit codes
// 127 and 126 instead of spawn errors, and echoes the argv for operators.
const TRAMPOLINE: &str = r#"echo ARGV: "$@" >&2 && exec "$@""#;

pub fn shell_command(inv: &Invocation) -> Command {
    let mut cmd = Command::new(SHELL);
    cmd.arg("-c")
        .arg(TRAMPOLINE)
        .arg("sh")
        .arg(&inv.program)
        .args(&inv.args);
    cmd
}

/// Numeric exit code; a signal-terminated child reports `128 + signal` like a shell would.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
