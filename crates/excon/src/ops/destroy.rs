use excon_core::AdapterError;
use excon_exec::Invocation;
use excon_model::RuntimeName;
use excon_proto::Reply;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use crate::{Context, Outcome};

pub const DESTROY_OK: &str = "destroy/docker: ok";

/// `stop` then `rm`, always both, so a half-gone container still gets cleaned up.
///
/// The reply is sent whatever happens; the exit code is the last failing
/// step's code, or 0.
pub async fn destroy(ctx: &Context, container_id: &str) -> Result<Outcome, AdapterError> {
    let name = RuntimeName::for_container(container_id);
    let commands = ctx.commands();

    let mut codes = Vec::with_capacity(2);
    for inv in [commands.stop(&name), commands.rm(&name)] {
        codes.push(step(ctx, &inv).await);
    }

    let code = last_failure(codes);
    if code == 0 {
        info!(target: "excon.destroy", %name, "container destroyed");
    }
    Ok(Outcome::Done {
        code,
        reply: Some(Reply::status(DESTROY_OK)),
    })
}

/// Every step has already run; report the last one that failed.
pub fn last_failure<I>(codes: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    codes.into_iter().filter(|&c| c != 0).last().unwrap_or(0)
}

async fn step(ctx: &Context, inv: &Invocation) -> i32 {
    let out = match ctx.supervisor.run(inv).await {
        Ok(out) => out,
        Err(e) => {
            error!(target: "excon.destroy", argv = %inv, error = %e, "could not run runtime");
            return 1;
        }
    };
    // stdout is reserved for the reply; the runtime's chatter goes to stderr.
    forward_to_stderr(&out.stdout).await;
    if out.success() {
        return 0;
    }
    if ctx.config.destroy_tolerate_missing && is_missing(&out.stderr) {
        info!(target: "excon.destroy", argv = %inv, "container already gone");
        return 0;
    }
    warn!(target: "excon.destroy", argv = %inv, code = out.code, "bad exit code");
    out.code
}

async fn forward_to_stderr(text: &str) {
    if text.is_empty() {
        return;
    }
    let mut stderr = tokio::io::stderr();
    if let Err(e) = stderr.write_all(text.as_bytes()).await {
        debug!(target: "excon.destroy", error = %e, "cannot forward runtime output");
        return;
    }
    let _ = stderr.flush().await;
}

fn is_missing(stderr: &str) -> bool {
    stderr.to_ascii_lowercase().contains("no such container")
}
