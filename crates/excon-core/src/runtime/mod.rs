//! Docker CLI command lines.
use excon_exec::Invocation;
use excon_model::{ResourceLimits, RuntimeName, TaskEnv};

use crate::{
    config::{AdapterConfig, SANDBOX_DIR, WORK_DIR_VAR},
    resolve::ResolvedTask,
};

/// Suffix the runtime expects on a memory limit given in megabytes.
pub const MEMORY_UNIT: &str = "m";

pub struct CommandBuilder<'a> {
    cfg: &'a AdapterConfig,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(cfg: &'a AdapterConfig) -> Self {
        Self { cfg }
    }

    /// `run --name <name> <limits> <env> <options> <image> <argv>`.
    pub fn run(&self, name: &RuntimeName, task: &ResolvedTask) -> Invocation {
        let env = task
            .env
            .merged(&self.cfg.session_env)
            .merged(&TaskEnv::single(WORK_DIR_VAR, SANDBOX_DIR));

        self.cfg
            .runtime
            .invocation()
            .args(["run", "--name", name.as_str()])
            .args(limit_flags(&task.limits))
            .args(env.iter().flat_map(|kv| ["-e".to_string(), kv.to_assignment()]))
            .args(task.options.iter().cloned())
            .arg(task.image.clone())
            .args(task.argv.iter().cloned())
    }

    /// The `run` line, handed to the orchestrator's executor when the task brought none.
    pub fn launch(
        &self,
        name: &RuntimeName,
        task: &ResolvedTask,
        executor: Option<&str>,
    ) -> Invocation {
        let run = self.run(name, task);
        match executor {
            Some(path) if task.needs_executor_wrapper => run.wrapped_by(path),
            _ => run,
        }
    }

    pub fn wait(&self, name: &RuntimeName) -> Invocation {
        self.cfg.runtime.invocation().args(["wait", name.as_str()])
    }

    pub fn stop(&self, name: &RuntimeName) -> Invocation {
        self.cfg
            .runtime
            .invocation()
            .arg("stop")
            .arg(format!("-t={}", self.cfg.stop_grace_secs))
            .arg(name.as_str())
    }

    pub fn rm(&self, name: &RuntimeName) -> Invocation {
        self.cfg.runtime.invocation().args(["rm", name.as_str()])
    }

    /// Prints `true` once the container is up.
    pub fn inspect_running(&self, name: &RuntimeName) -> Invocation {
        self.cfg
            .runtime
            .invocation()
            .args(["inspect", "--format={{.State.Running}}", name.as_str()])
    }
}

// Ports are not mapped.
fn limit_flags(limits: &ResourceLimits) -> Vec<String> {
    let mut flags = Vec::new();
    if let Some(shares) = limits.cpu_shares {
        flags.push("-c".to_string());
        flags.push(shares.to_string());
    }
    if let Some(mb) = limits.memory_mb {
        flags.push("-m".to_string());
        flags.push(format!("{mb}{MEMORY_UNIT}"));
    }
    flags
}
