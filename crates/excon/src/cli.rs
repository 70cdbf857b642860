use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::{ArgAction, Args, Parser, Subcommand, builder::BoolishValueParser, error::ErrorKind};
use excon_core::{
    AdapterConfig, AdapterError,
    config::{
        DEFAULT_LAUNCH_DELAY_MS, DEFAULT_OS_RELEASE, DEFAULT_RUNTIME, DEFAULT_STOP_GRACE_SECS,
    },
};
use excon_observe::LoggerFormat;

#[derive(Parser, Debug)]
#[command(name = "excon")]
#[command(
    about = "Run orchestrator tasks in Docker containers (external containerizer)",
    long_about = None
)]
#[command(after_help = "EXAMPLES:
    excon launch  <container-id> --executor-wrapper /a/path < task_info.pb
    excon update  <container-id> < resources.pb
    excon usage   <container-id>
    excon wait    <container-id>
    excon destroy <container-id>

  launch starts a container from the TaskInfo on standard input. update and
  usage are no-ops: they return 0 and send back no data, so the orchestrator
  falls back to its default behaviour.
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Lifecycle,

    #[command(flatten)]
    pub settings: Settings,
}

/// Adapter knobs. The orchestrator never passes these flags, so each one is
/// normally set through its `EXCON_*` variable.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Runtime command line, e.g. `docker` or `sudo -n docker`
    #[arg(
        long,
        env = "EXCON_RUNTIME",
        default_value = DEFAULT_RUNTIME,
        global = true,
        hide = true
    )]
    pub runtime: String,

    /// Seconds `stop` waits before killing the container
    #[arg(
        long,
        env = "EXCON_STOP_GRACE_SECS",
        value_parser = clap::value_parser!(u64),
        default_value_t = DEFAULT_STOP_GRACE_SECS,
        global = true,
        hide = true
    )]
    pub stop_grace_secs: u64,

    /// Milliseconds `launch` gives the runtime to register the container
    #[arg(
        long,
        env = "EXCON_LAUNCH_DELAY_MS",
        value_parser = clap::value_parser!(u64),
        default_value_t = DEFAULT_LAUNCH_DELAY_MS,
        global = true,
        hide = true
    )]
    pub launch_delay_ms: u64,

    /// Poll the runtime until the container runs instead of sleeping
    #[arg(
        long,
        env = "EXCON_LAUNCH_POLL",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value = "false",
        global = true,
        hide = true
    )]
    pub launch_poll: bool,

    /// Count "no such container" from `stop`/`rm` as success
    #[arg(
        long,
        env = "EXCON_DESTROY_TOLERATE_MISSING",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value = "false",
        global = true,
        hide = true
    )]
    pub destroy_tolerate_missing: bool,

    /// os-release file used to pick an image when the task names none
    #[arg(
        long,
        env = "EXCON_OS_RELEASE",
        default_value = DEFAULT_OS_RELEASE,
        global = true,
        hide = true
    )]
    pub os_release: PathBuf,

    /// `EnvFilter` directive, e.g. `info` or `excon.launch=debug,warn`
    #[arg(long, env = "EXCON_LOG_LEVEL", default_value = "info", global = true, hide = true)]
    pub log_level: String,

    /// text, json or journald
    #[arg(long, env = "EXCON_LOG_FORMAT", default_value = "text", global = true, hide = true)]
    pub log_format: LoggerFormat,
}

impl Settings {
    /// Fold these settings into `base`, which already carries the session.
    pub fn apply(&self, base: AdapterConfig) -> Result<AdapterConfig, AdapterError> {
        let logger = base
            .logger
            .clone()
            .with_level(&self.log_level)
            .map_err(|e| AdapterError::Config(e.to_string()))?
            .with_format(self.log_format);

        Ok(AdapterConfig {
            runtime: self.runtime.parse()?,
            stop_grace_secs: self.stop_grace_secs,
            launch_delay: Duration::from_millis(self.launch_delay_ms),
            launch_poll: self.launch_poll,
            destroy_tolerate_missing: self.destroy_tolerate_missing,
            os_release: self.os_release.clone(),
            logger,
            ..base
        })
    }
}

/// The five operations of the containerizer protocol.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    /// Launch a container from the TaskInfo on stdin
    Launch {
        container_id: String,

        /// Executor to run the runtime under when the task brings none
        #[arg(long = "executor-wrapper", visible_alias = "mesos-executor", value_name = "PATH")]
        executor: Option<String>,
    },

    /// Adjust container resources (not supported; no-op)
    Update { container_id: String },

    /// Report container resource usage (not supported; no-op)
    Usage { container_id: String },

    /// Block until the container exits and report its status
    Wait { container_id: String },

    /// Stop and remove the container
    Destroy { container_id: String },
}

impl Lifecycle {
    pub fn name(&self) -> &'static str {
        match self {
            Lifecycle::Launch { .. } => "launch",
            Lifecycle::Update { .. } => "update",
            Lifecycle::Usage { .. } => "usage",
            Lifecycle::Wait { .. } => "wait",
            Lifecycle::Destroy { .. } => "destroy",
        }
    }

    pub fn container_id(&self) -> &str {
        match self {
            Lifecycle::Launch { container_id, .. }
            | Lifecycle::Update { container_id }
            | Lifecycle::Usage { container_id }
            | Lifecycle::Wait { container_id }
            | Lifecycle::Destroy { container_id } => container_id,
        }
    }
}

/// Exit code for a command line that did not name an operation.
///
/// Help goes to stdout with 0; anything else prints usage on stderr with 1.
pub fn exit_for(err: &clap::Error) -> ExitCode {
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::from(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse_cli(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("excon").chain(args.iter().copied()))
    }

    fn parse(args: &[&str]) -> Result<Lifecycle, clap::Error> {
        parse_cli(args).map(|c| c.command)
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn launch_with_wrapper() {
        let op = parse(&["launch", "c1", "--executor-wrapper", "/bin/exec"]).unwrap();
        assert_eq!(
            op,
            Lifecycle::Launch {
                container_id: "c1".into(),
                executor: Some("/bin/exec".into()),
            }
        );
        assert_eq!(op.name(), "launch");
    }

    #[test]
    fn legacy_wrapper_flag_is_accepted() {
        let op = parse(&["launch", "c1", "--mesos-executor", "/bin/exec"]).unwrap();
        assert!(matches!(op, Lifecycle::Launch { executor: Some(p), .. } if p == "/bin/exec"));
    }

    #[test]
    fn every_operation_takes_an_id() {
        for name in ["update", "usage", "wait", "destroy"] {
            let op = parse(&[name, "c 1"]).unwrap();
            assert_eq!(op.name(), name);
            assert_eq!(op.container_id(), "c 1");
        }
    }

    #[test]
    fn help_is_not_an_error_exit() {
        let cases: [&[&str]; 3] = [&["help"], &["--help"], &["-h"]];
        for args in cases {
            let err = parse(args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp, "{args:?}");
        }
    }

    #[test]
    fn missing_or_unknown_subcommand_fails() {
        let cases: [&[&str]; 3] = [&[], &["explode", "c1"], &["wait"]];
        for args in cases {
            let err = parse(args).unwrap_err();
            assert_ne!(err.kind(), ErrorKind::DisplayHelp, "{args:?}");
        }
    }

    #[test]
    fn settings_feed_the_adapter_config() {
        let cli = parse_cli(&[
            "destroy",
            "c1",
            "--runtime",
            "sudo -n docker",
            "--stop-grace-secs",
            "10",
            "--launch-delay-ms",
            "500",
            "--launch-poll",
            "yes",
            "--destroy-tolerate-missing",
            "on",
            "--log-format",
            "json",
        ])
        .unwrap();

        let session = AdapterConfig::default().with_session([("MESOS_SLAVE_ID", "S1")]);
        let cfg = cli.settings.apply(session).unwrap();
        assert_eq!(cfg.runtime.program, "sudo");
        assert_eq!(cfg.runtime.prefix, ["-n", "docker"]);
        assert_eq!(cfg.stop_grace_secs, 10);
        assert_eq!(cfg.launch_delay, Duration::from_millis(500));
        assert!(cfg.launch_poll);
        assert!(cfg.destroy_tolerate_missing);
        assert_eq!(cfg.logger.format, LoggerFormat::Json);
        assert_eq!(cfg.session_env.iter().count(), 1);
    }

    #[test]
    fn bad_setting_values_are_usage_errors() {
        let cases: [&[&str]; 3] = [
            &["wait", "c1", "--stop-grace-secs", "soon"],
            &["wait", "c1", "--launch-poll", "maybe"],
            &["wait", "c1", "--log-format", "xml"],
        ];
        for args in cases {
            let err = parse_cli(args).unwrap_err();
            assert!(
                matches!(err.kind(), ErrorKind::ValueValidation | ErrorKind::InvalidValue),
                "{args:?}: {:?}",
                err.kind()
            );
        }
    }

    #[test]
    fn bad_log_level_or_blank_runtime_is_a_config_error() {
        for args in [
            ["wait", "c1", "--log-level", "excon=verbose"],
            ["wait", "c1", "--runtime", "   "],
        ] {
            let cli = parse_cli(&args).unwrap();
            let err = cli.settings.apply(AdapterConfig::default()).unwrap_err();
            assert!(matches!(err, AdapterError::Config(_)), "{args:?}");
        }
    }

    #[cfg(all(target_os = "linux", feature = "journald"))]
    #[test]
    fn journald_format_is_available() {
        let cli = parse_cli(&["usage", "c1", "--log-format", "journald"]).unwrap();
        let cfg = cli.settings.apply(AdapterConfig::default()).unwrap();
        assert_eq!(cfg.logger.format, LoggerFormat::Journald);
    }
}
