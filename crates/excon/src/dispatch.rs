use std::io::Write;

use excon_proto::Reply;
use tracing::{debug, error};

use crate::{Context, Lifecycle, Outcome};

/// Run one operation to the end and return the process exit code.
///
/// Replies go to stdout exactly once. A detached launch closes stdout right
/// after its reply so the orchestrator stops reading, then mirrors the runtime's exit.
pub async fn dispatch(op: Lifecycle, ctx: &Context) -> i32 {
    let name = op.name();
    debug!(target: "excon.dispatch", op = name, container = op.container_id(), "dispatch");

    match op.execute(ctx).await {
        Ok(Outcome::Done { code, reply }) => match reply {
            Some(reply) => match emit(&reply) {
                0 => code,
                failed => failed,
            },
            None => code,
        },
        Ok(Outcome::Detached { reply, child }) => {
            let emitted = emit(&reply);
            release_stdout();
            if emitted != 0 {
                return emitted;
            }
            match child.wait().await {
                Ok(code) => code,
                Err(e) => {
                    error!(
                        target: "excon.dispatch",
                        op = name,
                        error = %e,
                        "lost the runtime process"
                    );
                    1
                }
            }
        }
        Err(e) => {
            error!(target: "excon.dispatch", op = name, error = %e, "operation failed");
            e.exit_code()
        }
    }
}

fn emit(reply: &Reply) -> i32 {
    let bytes = reply.encode();
    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(&bytes).and_then(|_| stdout.flush()) {
        Ok(()) => {
            debug!(target: "excon.dispatch", kind = reply.kind(), len = bytes.len(), "reply sent");
            0
        }
        Err(e) => {
            error!(target: "excon.dispatch", kind = reply.kind(), error = %e, "cannot write reply");
            1
        }
    }
}

fn release_stdout() {
    // SAFETY: fd 1 is not used again by this process after the reply was flushed.
    let rc = unsafe { libc::close(libc::STDOUT_FILENO) };
    if rc != 0 {
        let e = std::io::Error::last_os_error();
        error!(target: "excon.dispatch", error = %e, "cannot close stdout");
    }
}
