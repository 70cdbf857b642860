use std::{
    path::Path,
    time::{Duration, Instant},
};

use excon_core::{AdapterConfig, AdapterError, resolve};
use excon_exec::{Detached, DetachedIo, ExecResult};
use excon_model::RuntimeName;
use excon_proto::{Reply, decode_task};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use crate::{Context, Outcome};

pub const LAUNCH_OK: &str = "launch/docker: ok";

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const POLL_BUDGET_FACTOR: u32 = 20;

/// Move into the orchestrator's work directory, if it gave one and we are elsewhere.
pub fn enter_work_dir(cfg: &AdapterConfig) -> Result<(), AdapterError> {
    let Some(dir) = &cfg.work_dir else {
        return Ok(());
    };
    let target = std::path::absolute(dir)?;
    let current = std::env::current_dir()?;
    if target != current {
        info!(target: "excon.launch", dir = %target.display(), "changing directory to work dir");
        std::env::set_current_dir(&target)?;
    }
    Ok(())
}

pub async fn read_stdin() -> Result<Vec<u8>, AdapterError> {
    let mut buf = Vec::new();
    tokio::io::stdin().read_to_end(&mut buf).await?;
    Ok(buf)
}

/// Start the container and hand it off.
///
/// The runtime's output goes to `stdout`/`stderr` under `sandbox`. The reply is
/// returned once the runtime had a chance to register the container; the
/// dispatcher then waits for the runtime process itself.
pub async fn launch(
    ctx: &Context,
    container_id: &str,
    executor: Option<&str>,
    input: &[u8],
    sandbox: &Path,
) -> Result<Outcome, AdapterError> {
    let task = decode_task(input)?;
    let resolved = resolve(&task, ctx.matcher.as_ref())?;
    let name = RuntimeName::for_container(container_id);

    if resolved.needs_executor_wrapper && executor.is_none() {
        debug!(target: "excon.launch", "task has no executor and none was supplied");
    }
    let inv = ctx.commands().launch(&name, &resolved, executor);

    info!(
        target: "excon.launch",
        task_id = %task.task_id.value,
        %name,
        image = %resolved.image,
        "launching container"
    );
    let mut child = ctx
        .supervisor
        .run_detached(&inv, &DetachedIo::in_dir(sandbox))?;

    if ctx.config.launch_poll {
        let seen = poll_registration(ctx, &name, &mut child).await;
        debug!(target: "excon.launch", %name, ?seen, "registration polling finished");
    } else {
        // Known race: nothing confirms the runtime registered the name in this window.
        tokio::time::sleep(ctx.config.launch_delay).await;
    }

    Ok(Outcome::Detached {
        reply: Reply::status(LAUNCH_OK),
        child,
    })
}

/// How registration polling ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The runtime reports the container running.
    Running,
    /// The launch process finished first, with this code.
    Exited(i32),
    /// The budget ran out first.
    TimedOut,
    /// Polling itself broke; the launch goes ahead regardless.
    Unknown,
}

/// Ask the runtime until it reports the container running, the launch
/// process exits, or the budget runs out. Never fails the launch: the
/// runtime is already running by now and must get its reply.
async fn poll_registration(
    ctx: &Context,
    name: &RuntimeName,
    child: &mut Detached,
) -> Registration {
    settle(name, poll_until_seen(ctx, name, child).await)
}

fn settle(name: &RuntimeName, polled: ExecResult<Registration>) -> Registration {
    polled.unwrap_or_else(|e| {
        warn!(target: "excon.launch", %name, error = %e, "registration polling failed");
        Registration::Unknown
    })
}

async fn poll_until_seen(
    ctx: &Context,
    name: &RuntimeName,
    child: &mut Detached,
) -> ExecResult<Registration> {
    let budget = ctx.config.launch_delay * POLL_BUDGET_FACTOR;
    let started = Instant::now();
    let inspect = ctx.commands().inspect_running(name);

    loop {
        if let Some(code) = child.try_code()? {
            return Ok(Registration::Exited(code));
        }
        let out = ctx.supervisor.capture(&inspect).await?;
        if out.success() && out.stdout.trim() == "true" {
            return Ok(Registration::Running);
        }
        if started.elapsed() >= budget {
            warn!(
                target: "excon.launch",
                %name,
                budget_ms = budget.as_millis() as u64,
                "container not seen running; replying anyway"
            );
            return Ok(Registration::TimedOut);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
