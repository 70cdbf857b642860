use excon_core::AdapterError;
use excon_exec::Detached;
use excon_proto::Reply;

use crate::{Context, Lifecycle};

pub mod destroy;
pub mod launch;
pub mod wait;

/// What an operation hands back to the dispatcher.
#[derive(Debug)]
pub enum Outcome {
    /// Finished: write `reply` if any and exit with `code`.
    Done { code: i32, reply: Option<Reply> },
    /// A runtime process is still running: write `reply`, release stdout,
    /// then exit with whatever `child` exits with.
    Detached { reply: Reply, child: Detached },
}

impl Outcome {
    /// Success with nothing to say.
    pub fn silent() -> Self {
        Outcome::Done {
            code: 0,
            reply: None,
        }
    }
}

impl Lifecycle {
    pub async fn execute(self, ctx: &Context) -> Result<Outcome, AdapterError> {
        match self {
            Lifecycle::Launch {
                container_id,
                executor,
            } => {
                launch::enter_work_dir(&ctx.config)?;
                let input = launch::read_stdin().await?;
                let sandbox = std::env::current_dir()?;
                launch::launch(ctx, &container_id, executor.as_deref(), &input, &sandbox).await
            }
            // Declining is allowed by the protocol; the orchestrator then uses its defaults.
            Lifecycle::Update { .. } | Lifecycle::Usage { .. } => Ok(Outcome::silent()),
            Lifecycle::Wait { container_id } => wait::wait(ctx, &container_id).await,
            Lifecycle::Destroy { container_id } => destroy::destroy(ctx, &container_id).await,
        }
    }
}
