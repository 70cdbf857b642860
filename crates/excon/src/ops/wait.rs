use excon_core::AdapterError;
use excon_model::{RuntimeName, collapse_exit_code};
use excon_proto::Reply;
use tracing::{info, warn};

use crate::{Context, Outcome};

pub const WAIT_OK: &str = "wait/docker: ok";

/// Block on `wait` and report the container's exit status.
///
/// No timeout: the orchestrator bounds this from outside if it wants to.
pub async fn wait(ctx: &Context, container_id: &str) -> Result<Outcome, AdapterError> {
    let name = RuntimeName::for_container(container_id);
    let inv = ctx.commands().wait(&name);

    let out = ctx.supervisor.run(&inv).await?;
    if !out.success() {
        return Err(AdapterError::RuntimeInvocationFailed {
            argv: inv.to_string(),
            code: out.code,
        });
    }

    let code = parse_exit_code(&out.stdout)?;
    if code != 0 {
        warn!(target: "excon.wait", %name, code, "container exited non-zero");
    } else {
        info!(target: "excon.wait", %name, "container exited");
    }

    Ok(Outcome::Done {
        code: 0,
        reply: Some(Reply::termination(collapse_exit_code(code), false, WAIT_OK)),
    })
}

/// The runtime prints a single integer, possibly negative.
pub fn parse_exit_code(output: &str) -> Result<i64, AdapterError> {
    let trimmed = output.trim();
    trimmed
        .parse::<i64>()
        .map_err(|e| AdapterError::ReplyParseFailure {
            output: trimmed.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_runtime_output() {
        assert_eq!(parse_exit_code("137\n").unwrap(), 137);
        assert_eq!(parse_exit_code("  -1 ").unwrap(), -1);
        assert_eq!(parse_exit_code("0").unwrap(), 0);
    }

    #[test]
    fn garbage_is_a_parse_failure() {
        for output in ["", "abc", "1.5", "137 138"] {
            let err = parse_exit_code(output).unwrap_err();
            assert!(matches!(err, AdapterError::ReplyParseFailure { .. }), "{output:?}");
            assert_eq!(err.exit_code(), 1);
        }
    }
}
