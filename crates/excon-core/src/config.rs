//! Adapter settings, assembled once at startup.
//!
//! The adapter's own knobs arrive through the command line layer (flags or
//! `EXCON_*` variables); the orchestrator's session identifiers and work
//! directory are captured here. Nothing else in the adapter looks at
//! environment variables.
use std::{path::PathBuf, str::FromStr, time::Duration};

use excon_exec::Invocation;
use excon_model::TaskEnv;
use excon_observe::LoggerConfig;

use crate::error::AdapterError;

/// Orchestrator session variables copied into every launched container, in this order.
pub const SESSION_VARS: [&str; 4] = [
    "MESOS_SLAVE_ID",
    "MESOS_FRAMEWORK_ID",
    "MESOS_EXECUTOR_ID",
    "MESOS_SLAVE_PID",
];

/// Work directory the orchestrator assigned to this task.
pub const WORK_DIR_VAR: &str = "MESOS_DIRECTORY";

/// Value of [`WORK_DIR_VAR`] as seen from inside the container.
pub const SANDBOX_DIR: &str = "/tmp";

pub const DEFAULT_RUNTIME: &str = "docker";
pub const DEFAULT_STOP_GRACE_SECS: u64 = 2;
pub const DEFAULT_LAUNCH_DELAY_MS: u64 = 250;
pub const DEFAULT_LAUNCH_DELAY: Duration = Duration::from_millis(DEFAULT_LAUNCH_DELAY_MS);
pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";

/// The runtime CLI, possibly behind a prefix such as `sudo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeCommand {
    pub program: String,
    pub prefix: Vec<String>,
}

impl RuntimeCommand {
    /// Start an invocation of the runtime; callers append the subcommand.
    pub fn invocation(&self) -> Invocation {
        Invocation::new(&self.program).args(self.prefix.iter().cloned())
    }
}

/// Whitespace-separated: the first word is the program, the rest its leading arguments.
impl FromStr for RuntimeCommand {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| AdapterError::Config("runtime command is empty".to_string()))?;
        Ok(Self {
            program,
            prefix: words.collect(),
        })
    }
}

impl Default for RuntimeCommand {
    fn default() -> Self {
        Self {
            program: DEFAULT_RUNTIME.to_string(),
            prefix: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub runtime: RuntimeCommand,
    /// Session variables that were actually set, in [`SESSION_VARS`] order.
    pub session_env: TaskEnv,
    /// Directory `launch` moves into before doing anything else.
    pub work_dir: Option<PathBuf>,
    /// Seconds `stop` waits before the runtime kills the container.
    pub stop_grace_secs: u64,
    /// How long `launch` gives the runtime to register the container.
    pub launch_delay: Duration,
    /// Poll the runtime for the container instead of sleeping the whole delay.
    pub launch_poll: bool,
    /// Treat "no such container" from `stop`/`rm` as success.
    pub destroy_tolerate_missing: bool,
    pub os_release: PathBuf,
    pub logger: LoggerConfig,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeCommand::default(),
            session_env: TaskEnv::new(),
            work_dir: None,
            stop_grace_secs: DEFAULT_STOP_GRACE_SECS,
            launch_delay: DEFAULT_LAUNCH_DELAY,
            launch_poll: false,
            destroy_tolerate_missing: false,
            os_release: PathBuf::from(DEFAULT_OS_RELEASE),
            logger: LoggerConfig::default(),
        }
    }
}

impl AdapterConfig {
    /// Capture the session from this process's environment.
    pub fn with_process_session(self) -> Self {
        self.with_session(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Take the allow-listed session variables and the work directory from `vars`.
    ///
    /// Unset and empty values are skipped.
    pub fn with_session<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: Vec<(String, String)> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        let get = |key: &str| {
            vars.iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        self.session_env = SESSION_VARS
            .iter()
            .filter_map(|&key| get(key).map(|v| (key, v)))
            .collect();
        self.work_dir = get(WORK_DIR_VAR).map(PathBuf::from);
        self
    }
}
